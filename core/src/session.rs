// core/src/session.rs
use log::warn;

use crate::errors::WorkoutError;
use crate::models::{Workout, WorkoutDraft, WorkoutPatch};
use crate::storage::KeyValueStorage;
use crate::store::{SortMode, WorkoutStore};
use crate::surface::{GeolocationError, GeolocationProvider, ListSurface, MapSurface, MarkerRegistry};

/// Kobler lageret til presentasjonsflatene og eier markørregisteret.
/// Eksplisitt konstruert kontekst, ingen ambient tilstand: alt som skal
/// vises, flyter gjennom denne. Én hendelse behandles ferdig før neste.
pub struct Session<S, M, L>
where
    S: KeyValueStorage,
    M: MapSurface,
    L: ListSurface,
{
    store: WorkoutStore<S>,
    map: M,
    list: L,
    markers: MarkerRegistry<M::Handle>,
}

impl<S, M, L> Session<S, M, L>
where
    S: KeyValueStorage,
    M: MapSurface,
    L: ListSurface,
{
    pub fn new(store: WorkoutStore<S>, map: M, list: L) -> Self {
        Self {
            store,
            map,
            list,
            markers: MarkerRegistry::new(),
        }
    }

    pub fn store(&self) -> &WorkoutStore<S> {
        &self.store
    }

    pub fn markers(&self) -> &MarkerRegistry<M::Handle> {
        &self.markers
    }

    /// Sentrer kartet på brukerens posisjon og spill av alle lagrede økter
    /// på kart og liste. Posisjonsoppslaget er engangs og kan feile.
    pub fn start(&mut self, geo: &mut dyn GeolocationProvider) -> Result<(), GeolocationError> {
        let here = geo.current_position()?;
        self.map.pan_to(here);

        for workout in self.store.workouts() {
            let handle =
                self.map
                    .place_marker(workout.coordinates, &workout.description, workout.kind());
            self.markers.insert(workout.id.clone(), handle);
            self.list.render_entry(workout);
        }
        Ok(())
    }

    /// Gyldig skjemainnsending: bygg økta, sett markør, tegn oppføring,
    /// legg til i lageret (som lagrer). Returnerer den nye id-en.
    pub fn log_workout(&mut self, draft: WorkoutDraft) -> Result<String, WorkoutError> {
        let workout = match Workout::try_new(draft) {
            Ok(w) => w,
            Err(e) => {
                self.store.metrics().validation_reject_total.inc();
                warn!("Avvist skjemainnsending: {e}");
                return Err(e);
            }
        };

        let id = workout.id.clone();
        let handle =
            self.map
                .place_marker(workout.coordinates, &workout.description, workout.kind());
        self.markers.insert(id.clone(), handle);
        self.list.render_entry(&workout);
        self.store.add(workout)?;
        Ok(id)
    }

    /// Klikk på en oppføring: panorer til markøren og tell interaksjonen.
    pub fn focus_workout(&mut self, id: &str) -> Result<(), WorkoutError> {
        let coordinates = self
            .store
            .get(id)
            .ok_or_else(|| WorkoutError::NotFound(id.to_string()))?
            .coordinates;
        self.map.pan_to(coordinates);
        self.store.register_click(id)?;
        Ok(())
    }

    /// Lagre en redigering og tegn oppføringen på nytt med friske verdier.
    pub fn save_edit(&mut self, id: &str, patch: &WorkoutPatch) -> Result<(), WorkoutError> {
        let updated = self.store.update(id, patch)?.clone();
        self.list.remove_entry(id);
        self.list.render_entry(&updated);
        Ok(())
    }

    /// Slett en økt: oppføring, markør og lagerpost følger hverandre.
    pub fn delete_workout(&mut self, id: &str) -> Result<(), WorkoutError> {
        let removed = self.store.remove(id)?;
        if let Some(handle) = self.markers.take(&removed.id) {
            self.map.remove_marker(handle);
        }
        self.list.remove_entry(&removed.id);
        Ok(())
    }

    /// Veksle sorteringsmodus og tegn lista på nytt i gjeldende rekkefølge.
    pub fn toggle_sort(&mut self) -> SortMode {
        let mode = self.store.toggle_sort();
        self.list.clear_entries();
        for workout in self.store.view() {
            self.list.render_entry(workout);
        }
        mode
    }

    /// Nullstill alt: tøm lageret, fjern alle markører og hele lista.
    /// Destruktivt og irreversibelt.
    pub fn reset(&mut self) -> Result<(), WorkoutError> {
        self.store.clear_all()?;
        for (_, handle) in self.markers.drain() {
            self.map.remove_marker(handle);
        }
        self.list.clear_entries();
        Ok(())
    }
}
