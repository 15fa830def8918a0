//! Demo campus seeded into an empty database on first start.

use tracing::info;

use crate::db::Database;
use crate::error::Result;
use crate::orientation::Orientation;
use crate::places::derive_geo;

struct PlaceSeed {
    id: i64,
    slug: &'static str,
    floor: &'static str,
    zone: &'static str,
    x: f64,
    y: f64,
    kind: &'static str,
    image_url: &'static str,
}

/// (from, to, distance, orientation, landmark)
type ConnectionSeed = (i64, i64, f64, Orientation, &'static str);

/// (place slug, name, description)
type TranslationSeed = (&'static str, &'static str, &'static str);

struct DashboardSeed {
    slug: &'static str,
    name: &'static str,
    description: &'static str,
    place_ids: &'static [i64],
}

/// (code, label, is_default)
const LANGUAGES: &[(&str, &str, bool)] = &[
    ("he", "עברית", true),
    ("en", "English", false),
    ("es", "Español", false),
    ("fr", "Français", false),
];

const PLACES: &[PlaceSeed] = &[
    PlaceSeed {
        id: 1,
        slug: "barzilai-main-lobby",
        floor: "Ground",
        zone: "Main Pavilion",
        x: 0.0,
        y: 0.0,
        kind: "entry",
        image_url: "https://images.unsplash.com/photo-1526256262350-7da7584cf5eb?auto=format&fit=crop&w=600&q=80",
    },
    PlaceSeed {
        id: 2,
        slug: "emergency-department",
        floor: "Ground",
        zone: "Emergency Wing",
        x: -30.0,
        y: 0.0,
        kind: "critical-care",
        image_url: "https://images.unsplash.com/photo-1580281657521-54fd42ab7bef?auto=format&fit=crop&w=600&q=80",
    },
    PlaceSeed {
        id: 3,
        slug: "trauma-unit",
        floor: "Ground",
        zone: "Emergency Wing",
        x: -45.0,
        y: 0.0,
        kind: "critical-care",
        image_url: "https://images.unsplash.com/photo-1580281657521-028b5b1e0dab?auto=format&fit=crop&w=600&q=80",
    },
    PlaceSeed {
        id: 4,
        slug: "diagnostic-imaging",
        floor: "Ground",
        zone: "Clinical Services",
        x: 0.0,
        y: -20.0,
        kind: "diagnostic",
        image_url: "https://images.unsplash.com/photo-1580281658629-50c0d13b7ac8?auto=format&fit=crop&w=600&q=80",
    },
    PlaceSeed {
        id: 5,
        slug: "cardiology-institute",
        floor: "Ground",
        zone: "Clinical Tower",
        x: 20.0,
        y: 0.0,
        kind: "clinic",
        image_url: "https://images.unsplash.com/photo-1582719478250-c89cae4dc85b?auto=format&fit=crop&w=600&q=80",
    },
    PlaceSeed {
        id: 6,
        slug: "surgery-tower",
        floor: "First",
        zone: "Clinical Tower",
        x: 35.0,
        y: 0.0,
        kind: "surgery",
        image_url: "https://images.unsplash.com/photo-1580281555110-868c1d113e09?auto=format&fit=crop&w=600&q=80",
    },
    PlaceSeed {
        id: 7,
        slug: "intensive-care",
        floor: "Second",
        zone: "Critical Care",
        x: 35.0,
        y: 20.0,
        kind: "critical-care",
        image_url: "https://images.unsplash.com/photo-1582719478250-39f26015ec20?auto=format&fit=crop&w=600&q=80",
    },
    PlaceSeed {
        id: 8,
        slug: "maternity-pavilion",
        floor: "Second",
        zone: "Family Care",
        x: 20.0,
        y: 20.0,
        kind: "maternity",
        image_url: "https://images.unsplash.com/photo-1519494080410-f9aa76cb4283?auto=format&fit=crop&w=600&q=80",
    },
    PlaceSeed {
        id: 9,
        slug: "pediatric-center",
        floor: "Second",
        zone: "Family Care",
        x: 0.0,
        y: 20.0,
        kind: "clinic",
        image_url: "https://images.unsplash.com/photo-1582719478250-e50d00c5c6d1?auto=format&fit=crop&w=600&q=80",
    },
    PlaceSeed {
        id: 10,
        slug: "outpatient-clinics",
        floor: "Ground",
        zone: "Ambulatory Services",
        x: -30.0,
        y: 20.0,
        kind: "clinic",
        image_url: "https://images.unsplash.com/photo-1582719478181-2cf4eaf458cc?auto=format&fit=crop&w=600&q=80",
    },
];

const CONNECTIONS: &[ConnectionSeed] = &[
    (1, 2, 30.0, Orientation::West, "Emergency drop-off canopy"),
    (2, 1, 30.0, Orientation::East, "Lobby entry promenade"),
    (2, 3, 15.0, Orientation::West, "Trauma access corridor"),
    (3, 2, 15.0, Orientation::East, "Resuscitation alcove"),
    (1, 4, 20.0, Orientation::South, "Imaging reception"),
    (4, 1, 20.0, Orientation::North, "Main lobby"),
    (1, 5, 20.0, Orientation::East, "Clinical tower concourse"),
    (5, 1, 20.0, Orientation::West, "Main lobby link"),
    (5, 6, 15.0, Orientation::East, "Surgical preparation bridge"),
    (6, 5, 15.0, Orientation::West, "Cardiology foyer"),
    (6, 7, 20.0, Orientation::North, "Sky garden corridor"),
    (7, 6, 20.0, Orientation::South, "Surgery recovery"),
    (5, 8, 20.0, Orientation::North, "Family care elevators"),
    (8, 5, 20.0, Orientation::South, "Cardiology institute"),
    (1, 9, 20.0, Orientation::North, "Healing courtyard"),
    (9, 1, 20.0, Orientation::South, "Lobby garden"),
    (2, 10, 20.0, Orientation::North, "Ambulatory walkway"),
    (10, 2, 20.0, Orientation::South, "Emergency entrance"),
    (10, 9, 30.0, Orientation::East, "Clinic promenade"),
    (9, 10, 30.0, Orientation::West, "Outpatient plaza"),
    (9, 8, 20.0, Orientation::East, "Family lounge corridor"),
    (8, 9, 20.0, Orientation::West, "Pediatric nurses station"),
];

const HE_TRANSLATIONS: &[TranslationSeed] = &[
    ("barzilai-main-lobby", "לובי מרכז ברזילי", "כניסה ראשית עם עמדת קבלה, מוקד מידע ומעבר מהיר לכל אגפי המרכז הרפואי."),
    ("emergency-department", "חדר מיון", "מוקד טיפול דחוף עם צוות רב-מקצועי עבור מקרים דחופים ונפגעים."),
    ("trauma-unit", "יחידת טראומה", "יחידה מתקדמת לטיפול בפצועים מורכבים עם חדרי ניתוח וציוד הצלה ייעודי."),
    ("diagnostic-imaging", "מרכז הדמיה", "MRI, CT, אולטרסאונד וצילום רנטגן עם צוות מומחים לקריאה מיידית."),
    ("cardiology-institute", "מכון הקרדיולוגיה", "בדיקות לב מתקדמות, צנתורים ומרפאות מעקב לחולי לב."),
    ("surgery-tower", "מגדל הניתוחים", "קומפלקס חדרי ניתוח היברידיים, התאוששות ותמיכה לאחר ניתוח."),
    ("intensive-care", "יחידת טיפול נמרץ", "טיפול רציף במטופלים במצב קריטי עם ניטור מתקדם סביב השעון."),
    ("maternity-pavilion", "אגף נשים ויולדות", "חדרי לידה, אשפוז יולדות וקליניקות לבריאות האישה."),
    ("pediatric-center", "מרכז הילדים", "מרפאות ילדים, מחלקת אשפוז וחדרי משחק מותאמים למשפחות."),
    ("outpatient-clinics", "מרפאות החוץ", "מרכז מרפאות רב-תחומי לתורים מתואמים ומעקב בקהילה."),
];

const EN_TRANSLATIONS: &[TranslationSeed] = &[
    ("barzilai-main-lobby", "Barzilai Main Lobby", "Primary entrance with reception, information desk, and access to all hospital wings."),
    ("emergency-department", "Emergency Department", "Acute care hub staffed 24/7 for urgent and life-threatening cases."),
    ("trauma-unit", "Trauma Unit", "Advanced trauma suites with dedicated surgical support for critical injuries."),
    ("diagnostic-imaging", "Diagnostic Imaging Center", "MRI, CT, ultrasound, and radiography with rapid reporting for clinicians."),
    ("cardiology-institute", "Cardiology Institute", "Cath labs, echo suites, and cardiology clinics for comprehensive heart care."),
    ("surgery-tower", "Surgery Tower", "Hybrid operating rooms, pre-op preparation, and post-anesthesia recovery."),
    ("intensive-care", "Intensive Care Unit", "Continuous critical care with advanced monitoring and multidisciplinary teams."),
    ("maternity-pavilion", "Maternity Pavilion", "Labor and delivery suites, mother-baby rooms, and women’s health services."),
    ("pediatric-center", "Pediatric Center", "Children’s clinics, inpatient ward, and family-friendly play spaces."),
    ("outpatient-clinics", "Outpatient Clinics", "Coordinated specialty clinics for pre-scheduled visits and follow-up care."),
];

const ES_TRANSLATIONS: &[TranslationSeed] = &[
    ("barzilai-main-lobby", "Vestíbulo Principal Barzilai", "Entrada principal con recepción, información y acceso a todas las alas del hospital."),
    ("emergency-department", "Servicio de Urgencias", "Centro de atención aguda disponible 24/7 para casos urgentes y críticos."),
    ("trauma-unit", "Unidad de Trauma", "Salas avanzadas para trauma con apoyo quirúrgico dedicado para lesiones graves."),
    ("diagnostic-imaging", "Centro de Imagenología", "MRI, TAC, ecografía y radiología con informes rápidos para el personal médico."),
    ("cardiology-institute", "Instituto de Cardiología", "Laboratorios de cateterismo, ecocardiogramas y clínicas especializadas del corazón."),
    ("surgery-tower", "Torre de Cirugía", "Quirófanos híbridos con áreas de preparación y recuperación postoperatoria."),
    ("intensive-care", "UCI", "Cuidados intensivos continuos con monitoreo avanzado y equipos multidisciplinarios."),
    ("maternity-pavilion", "Pabellón de Maternidad", "Salas de parto, hospitalización materna y servicios de salud de la mujer."),
    ("pediatric-center", "Centro Pediátrico", "Clínicas infantiles, hospitalización y espacios lúdicos adaptados a las familias."),
    ("outpatient-clinics", "Clínicas Ambulatorias", "Clínicas especializadas coordinadas para consultas programadas y seguimiento."),
];

const FR_TRANSLATIONS: &[TranslationSeed] = &[
    ("barzilai-main-lobby", "Hall Principal Barzilaï", "Entrée principale avec accueil, information et accès à toutes les ailes de l’hôpital."),
    ("emergency-department", "Service des Urgences", "Centre de soins intensifs disponible 24/7 pour les cas urgents et vitaux."),
    ("trauma-unit", "Unité de Traumatologie", "Salles de trauma avancées avec support chirurgical dédié pour blessures graves."),
    ("diagnostic-imaging", "Centre d’Imagerie", "IRM, scanner, échographie et radiologie avec comptes rendus rapides."),
    ("cardiology-institute", "Institut de Cardiologie", "Laboratoires de cathétérisme, échocardiographie et cliniques spécialisées du cœur."),
    ("surgery-tower", "Tour de Chirurgie", "Blocs opératoires hybrides avec préparation préopératoire et salle de réveil."),
    ("intensive-care", "Unité de Soins Intensifs", "Prise en charge continue avec surveillance avancée et équipes multidisciplinaires."),
    ("maternity-pavilion", "Pavillon de Maternité", "Salles d’accouchement, chambres mère-bébé et services de santé féminine."),
    ("pediatric-center", "Centre Pédiatrique", "Cliniques pour enfants, service d’hospitalisation et espaces ludiques familiaux."),
    ("outpatient-clinics", "Cliniques Externes", "Cliniques spécialisées coordonnées pour consultations programmées et suivi."),
];
const DASHBOARDS: &[DashboardSeed] = &[
    DashboardSeed {
        slug: "barzilai-campus",
        name: "קמפוס ברזילי",
        description: "כלל מוקדי בית החולים ברזילי בתצוגה אחת.",
        place_ids: &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
    },
    DashboardSeed {
        slug: "critical-care-path",
        name: "מסלול טיפול נמרץ",
        description: "מסלול מהכניסה הראשית אל אגפי המיון והטיפול הקריטי.",
        place_ids: &[1, 2, 3, 4, 6, 7],
    },
    DashboardSeed {
        slug: "family-care-tour",
        name: "מסלול משפחות",
        description: "מחלקות נשים, יולדות וילדים במסלול נוח למשפחות.",
        place_ids: &[1, 5, 8, 9, 10],
    },
];

fn translations() -> [(&'static str, &'static [TranslationSeed]); 4] {
    [
        ("he", HE_TRANSLATIONS),
        ("en", EN_TRANSLATIONS),
        ("es", ES_TRANSLATIONS),
        ("fr", FR_TRANSLATIONS),
    ]
}

impl Database {
    /// Seed the demo campus when no place exists yet.
    ///
    /// Returns whether anything was written. Everything commits in one
    /// transaction.
    pub async fn seed_demo_data(&self) -> Result<bool> {
        let mut tx = self.begin_write().await?;

        let place_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM places")
            .fetch_one(&mut *tx)
            .await?;
        if place_count > 0 {
            info!("Skipping demo seed: {} places already present", place_count);
            return Ok(false);
        }

        for &(code, label, is_default) in LANGUAGES {
            sqlx::query("INSERT OR IGNORE INTO languages (code, label, is_default) VALUES (?1, ?2, ?3)")
                .bind(code)
                .bind(label)
                .bind(is_default)
                .execute(&mut *tx)
                .await?;
        }

        for place in PLACES {
            let (latitude, longitude) = derive_geo(place.x, place.y);
            sqlx::query(
                "INSERT INTO places (id, slug, floor, zone, x, y, type, image_url, latitude, longitude)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )
            .bind(place.id)
            .bind(place.slug)
            .bind(place.floor)
            .bind(place.zone)
            .bind(place.x)
            .bind(place.y)
            .bind(place.kind)
            .bind(place.image_url)
            .bind(latitude)
            .bind(longitude)
            .execute(&mut *tx)
            .await?;
        }

        for (language, rows) in translations() {
            for &(slug, name, description) in rows {
                sqlx::query(
                    "INSERT INTO place_translations (place_id, language_code, name, description)
                     SELECT id, ?1, ?2, ?3 FROM places WHERE slug = ?4",
                )
                .bind(language)
                .bind(name)
                .bind(description)
                .bind(slug)
                .execute(&mut *tx)
                .await?;
            }
        }

        for &(from_id, to_id, distance, orientation, landmark) in CONNECTIONS {
            sqlx::query(
                "INSERT INTO connections (from_place_id, to_place_id, distance, orientation, landmark)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(from_id)
            .bind(to_id)
            .bind(distance)
            .bind(orientation)
            .bind(landmark)
            .execute(&mut *tx)
            .await?;
        }

        for dashboard in DASHBOARDS {
            let dashboard_id = sqlx::query(
                "INSERT INTO dashboards (slug, name, description) VALUES (?1, ?2, ?3)",
            )
            .bind(dashboard.slug)
            .bind(dashboard.name)
            .bind(dashboard.description)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

            for &place_id in dashboard.place_ids {
                sqlx::query("INSERT INTO dashboard_places (dashboard_id, place_id) VALUES (?1, ?2)")
                    .bind(dashboard_id)
                    .bind(place_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        info!(
            "✓ Seeded demo campus: {} places, {} connections, {} dashboards",
            PLACES.len(),
            CONNECTIONS.len(),
            DASHBOARDS.len()
        );
        Ok(true)
    }
}
