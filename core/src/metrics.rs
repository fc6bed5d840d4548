// core/src/metrics.rs
use once_cell::sync::Lazy;
use prometheus::{IntCounter, Registry};

/// Pace (min/km) = varighet / distanse.
/// Forutsetter validert input (distance > 0).
pub fn pace_min_per_km(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

/// Fart (km/t) = distanse / (varighet/60).
/// Forutsetter validert input (duration > 0).
pub fn speed_km_per_h(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

/// Felles registry for alle tellerne i prosessen.
static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Prosessens registry, for eksport/skraping av tellerne
/// (`registry().gather()`).
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Tellere for lager- og valideringsaktivitet.
#[derive(Clone)]
pub struct Metrics {
    pub persist_total: IntCounter,
    pub load_total: IntCounter,
    pub validation_reject_total: IntCounter,
    pub sort_toggle_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let persist_total =
            IntCounter::new("store_persist_total", "Antall fulle skriv til lageret")
                .expect("counter");
        let load_total = IntCounter::new("store_load_total", "Antall innlastinger fra lageret")
            .expect("counter");
        let validation_reject_total = IntCounter::new(
            "validation_reject_total",
            "Antall avviste skjemainnsendinger",
        )
        .expect("counter");
        let sort_toggle_total =
            IntCounter::new("sort_toggle_total", "Antall bytter av sorteringsmodus")
                .expect("counter");

        // Registrering feiler ved duplikatnavn (flere Metrics i samme prosess);
        // tellerne virker uansett, så resultatet ignoreres.
        let _ = REGISTRY.register(Box::new(persist_total.clone()));
        let _ = REGISTRY.register(Box::new(load_total.clone()));
        let _ = REGISTRY.register(Box::new(validation_reject_total.clone()));
        let _ = REGISTRY.register(Box::new(sort_toggle_total.clone()));

        Self {
            persist_total,
            load_total,
            validation_reject_total,
            sort_toggle_total,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
