// core/src/surface.rs
use std::collections::HashMap;

use thiserror::Error;

use crate::models::{Coordinates, Workout, WorkoutKind};

/// Kartflate. Implementeres av presentasjonslaget (Leaflet-binding e.l.);
/// kjernen eier aldri markørene, bare korrelasjonen id → håndtak.
pub trait MapSurface {
    type Handle;

    fn place_marker(
        &mut self,
        coordinates: Coordinates,
        popup_text: &str,
        kind: WorkoutKind,
    ) -> Self::Handle;

    fn remove_marker(&mut self, handle: Self::Handle);

    fn pan_to(&mut self, coordinates: Coordinates);
}

/// Listeflate (sidepanelet med øktoppføringer).
pub trait ListSurface {
    fn render_entry(&mut self, workout: &Workout);
    fn remove_entry(&mut self, id: &str);
    /// Tøm hele lista, brukt ved ny opptegning etter sorteringsbytte.
    fn clear_entries(&mut self);
}

#[derive(Debug, Error)]
#[error("geolocation: {0}")]
pub struct GeolocationError(pub String);

/// Engangs posisjonsoppslag. Kan feile (bruker avslår, ingen dekning).
pub trait GeolocationProvider {
    fn current_position(&mut self) -> Result<Coordinates, GeolocationError>;
}

/// Register over markørhåndtak, korrelert med økter via id.
#[derive(Debug, Default)]
pub struct MarkerRegistry<H> {
    handles: HashMap<String, H>,
}

impl<H> MarkerRegistry<H> {
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, handle: H) {
        self.handles.insert(id.into(), handle);
    }

    /// Ta ut håndtaket for en fjernet økt, om det finnes.
    pub fn take(&mut self, id: &str) -> Option<H> {
        self.handles.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Tøm registeret og lever ut alle håndtakene (nullstilling).
    pub fn drain(&mut self) -> impl Iterator<Item = (String, H)> + '_ {
        self.handles.drain()
    }
}
