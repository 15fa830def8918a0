//! Internationalization (i18n) for rendered directions.
//!
//! # Architecture
//!
//! - `registry`: built-in locales and the English fallback
//! - `strings`: per-locale distance unit, orientation labels and step templates
//!
//! Place names and descriptions are data, not UI strings; they are resolved
//! from the database by [`crate::translations`].

mod registry;
mod strings;

pub use registry::{LocaleConfig, LocaleRegistry};
pub use strings::{LocaleStrings, OrientationLabels};

use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::orientation::Orientation;

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

/// Parameters for one rendered direction step
#[derive(Debug, Clone)]
pub struct StepParams<'a> {
    pub destination: &'a str,
    pub distance: f64,
    pub orientation: Orientation,
    pub landmark: Option<&'a str>,
}

/// Localized label for an orientation.
pub fn orientation_label(locale: &str, orientation: Orientation) -> &'static str {
    LocaleRegistry::get()
        .strings_for(locale)
        .orientation_labels
        .label(orientation)
}

/// Render a step instruction sentence.
///
/// Distances are rounded to whole units. An empty landmark is treated as
/// absent and selects the plain template. Placeholders are filled in one
/// pass, so braces inside a landmark or place name stay literal.
pub fn format_direction_step(locale: &str, params: &StepParams<'_>) -> String {
    let strings = LocaleRegistry::get().strings_for(locale);
    let landmark = params.landmark.map(str::trim).filter(|l| !l.is_empty());
    let template = match landmark {
        Some(_) => strings.direction_step_with_landmark,
        None => strings.direction_step,
    };

    let distance = format_distance(params.distance);
    let placeholder = PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{(\w+)\}").expect("Invalid placeholder regex"));
    placeholder
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "distance" => distance.clone(),
            "unit" => strings.distance_unit.to_string(),
            "orientation" => strings
                .orientation_labels
                .label(params.orientation)
                .to_string(),
            "landmark" => landmark.unwrap_or("").to_string(),
            "destination" => params.destination.to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

fn format_distance(distance: f64) -> String {
    format!("{}", distance.round() as i64)
}
