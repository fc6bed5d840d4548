// core/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::WorkoutError;
use crate::metrics::{pace_min_per_km, speed_km_per_h};

/// Koordinatpar. Serialiseres som `[lat, lng]` (samme rekkefølge som
/// det lagrede blob-formatet).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub f64, pub f64);

impl Coordinates {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lng(&self) -> f64 {
        self.1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "👟",
            WorkoutKind::Cycling => "🚲",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }
}

/// Typespesifikk verdi som tagget variant. Lagrede økter er rene data uten
/// oppførsel, så formelvalget gjenopprettes fra `kind`-taggen ved innlasting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum KindData {
    Running {
        cadence: u32, // steg/min
    },
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain: f64, // meter
    },
}

/// Én logget økt. Feltnavnene i JSON følger localStorage-blobformatet
/// (camelCase, koordinater som `[lat, lng]`, typefeltet flatet inn).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    #[serde(flatten)]
    pub kind_data: KindData,
    pub coordinates: Coordinates,
    pub distance: f64, // km
    pub duration: f64, // min
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub derived_metric: f64, // min/km (løping) eller km/t (sykling)
    pub interaction_count: u64,
}

/// Rå skjemaverdier før validering. `None` betyr tomt felt.
#[derive(Debug, Clone, Copy)]
pub struct WorkoutDraft {
    pub kind: WorkoutKind,
    pub coordinates: Coordinates,
    pub distance: Option<f64>,
    pub duration: Option<f64>,
    pub cadence: Option<f64>,
    pub elevation_gain: Option<f64>,
}

impl WorkoutDraft {
    pub fn running(coordinates: Coordinates, distance: f64, duration: f64, cadence: f64) -> Self {
        Self {
            kind: WorkoutKind::Running,
            coordinates,
            distance: Some(distance),
            duration: Some(duration),
            cadence: Some(cadence),
            elevation_gain: None,
        }
    }

    pub fn cycling(
        coordinates: Coordinates,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Self {
        Self {
            kind: WorkoutKind::Cycling,
            coordinates,
            distance: Some(distance),
            duration: Some(duration),
            cadence: None,
            elevation_gain: Some(elevation_gain),
        }
    }
}

/// Redigerbare felt for en eksisterende økt. `None` = uendret.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkoutPatch {
    pub distance: Option<f64>,
    pub duration: Option<f64>,
    pub cadence: Option<f64>,
    pub elevation_gain: Option<f64>,
}

// Løpenummer så to økter i samme millisekund får ulik id.
static ID_SEQ: AtomicU64 = AtomicU64::new(0);

/// Id fra tidsstempel: de siste ti sifrene av millisekund-klokka
/// pluss tresifret løpenummer.
fn generate_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().unsigned_abs() % 10_000_000_000;
    let seq = ID_SEQ.fetch_add(1, Ordering::Relaxed) % 1000;
    format!("{millis:010}{seq:03}")
}

fn require(value: Option<f64>, field: &'static str) -> Result<f64, WorkoutError> {
    value.ok_or(WorkoutError::EmptyField(field))
}

fn positive(value: f64, field: &'static str) -> Result<f64, WorkoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(WorkoutError::InvalidNumber(field))
    }
}

fn non_negative(value: f64, field: &'static str) -> Result<f64, WorkoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(WorkoutError::InvalidNumber(field))
    }
}

/// Kadens er et positivt heltall (steg/min).
fn cadence_steps(value: f64) -> Result<u32, WorkoutError> {
    let v = positive(value, "cadence")?;
    if v.fract() != 0.0 || v > f64::from(u32::MAX) {
        return Err(WorkoutError::InvalidNumber("cadence"));
    }
    Ok(v as u32)
}

impl Workout {
    /// Bygg en økt fra skjemaverdier, med `Utc::now()` som tidspunkt.
    pub fn try_new(draft: WorkoutDraft) -> Result<Self, WorkoutError> {
        Self::try_new_at(draft, Utc::now())
    }

    /// Som `try_new`, men med eksplisitt tidspunkt (deterministisk i tester).
    ///
    /// Manglende felt rapporteres før ugyldige tall («tomt felt» vinner
    /// over «ikke et tall»).
    pub fn try_new_at(
        draft: WorkoutDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, WorkoutError> {
        // Først: alle påkrevde felt må være til stede.
        let distance = require(draft.distance, "distance")?;
        let duration = require(draft.duration, "duration")?;
        let kind_value = match draft.kind {
            WorkoutKind::Running => require(draft.cadence, "cadence")?,
            WorkoutKind::Cycling => require(draft.elevation_gain, "elevationGain")?,
        };

        // Så: tallvalidering. Høydemeter kan være null, alt annet strengt positivt.
        let distance = positive(distance, "distance")?;
        let duration = positive(duration, "duration")?;
        let kind_data = match draft.kind {
            WorkoutKind::Running => KindData::Running {
                cadence: cadence_steps(kind_value)?,
            },
            WorkoutKind::Cycling => KindData::Cycling {
                elevation_gain: non_negative(kind_value, "elevationGain")?,
            },
        };

        let mut workout = Workout {
            id: generate_id(created_at),
            kind_data,
            coordinates: draft.coordinates,
            distance,
            duration,
            created_at,
            description: String::new(),
            derived_metric: 0.0,
            interaction_count: 0,
        };
        workout.recompute();
        // Beskrivelsen bygges én gang og caches, ikke ved hvert oppslag.
        workout.description = workout.describe();
        Ok(workout)
    }

    pub fn kind(&self) -> WorkoutKind {
        match self.kind_data {
            KindData::Running { .. } => WorkoutKind::Running,
            KindData::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    /// Pace (løping) eller fart (sykling) fra gjeldende felt.
    /// Kalles etter hver mutasjon og ved innlasting, aldri utdatert.
    pub fn recompute(&mut self) {
        self.derived_metric = match self.kind_data {
            KindData::Running { .. } => pace_min_per_km(self.distance, self.duration),
            KindData::Cycling { .. } => speed_km_per_h(self.distance, self.duration),
        };
    }

    /// «👟 Running on June 14» / «🚲 Cycling on June 14».
    fn describe(&self) -> String {
        let kind = self.kind();
        format!(
            "{} {} on {}",
            kind.icon(),
            kind.label(),
            self.created_at.format("%B %-d")
        )
    }

    /// Teller valg/fokus fra brukeren. Kosmetisk, utløser ingen lagring.
    pub fn register_click(&mut self) {
        self.interaction_count += 1;
    }

    /// Rediger distanse/varighet/typefelt. Alt valideres før noe muteres,
    /// så en avvist patch etterlater økta urørt. Avledet verdi beregnes
    /// på nytt ved suksess.
    pub fn apply_patch(&mut self, patch: &WorkoutPatch) -> Result<(), WorkoutError> {
        let distance = patch.distance.map(|v| positive(v, "distance")).transpose()?;
        let duration = patch.duration.map(|v| positive(v, "duration")).transpose()?;

        let cadence = match (patch.cadence, &self.kind_data) {
            (None, _) => None,
            (Some(v), KindData::Running { .. }) => Some(cadence_steps(v)?),
            // Kadens på sykkeløkt er et ugyldig felt, ikke en stille no-op.
            (Some(_), KindData::Cycling { .. }) => {
                return Err(WorkoutError::InvalidNumber("cadence"))
            }
        };
        let elevation_gain = match (patch.elevation_gain, &self.kind_data) {
            (None, _) => None,
            (Some(v), KindData::Cycling { .. }) => Some(non_negative(v, "elevationGain")?),
            (Some(_), KindData::Running { .. }) => {
                return Err(WorkoutError::InvalidNumber("elevationGain"))
            }
        };

        if let Some(d) = distance {
            self.distance = d;
        }
        if let Some(d) = duration {
            self.duration = d;
        }
        if let Some(c) = cadence {
            self.kind_data = KindData::Running { cadence: c };
        }
        if let Some(e) = elevation_gain {
            self.kind_data = KindData::Cycling { elevation_gain: e };
        }

        self.recompute();
        Ok(())
    }
}
