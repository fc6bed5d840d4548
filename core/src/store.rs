// core/src/store.rs
use log::{debug, info};
use ordered_float::OrderedFloat;

use crate::errors::WorkoutError;
use crate::metrics::Metrics;
use crate::models::{Workout, WorkoutPatch};
use crate::storage::{KeyValueStorage, KEY_WORKOUTS, KEY_WORKOUTS_SORT};

/// Sorteringsmodus for visningen. Starter i innsettingsrekkefølge og
/// veksler for resten av sesjonen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Insertion,
    ByDistanceAscending,
}

/// Den autoritative samlingen av økter pluss lagringsspeilet.
/// Hver mutasjon reserialiserer hele samlingen synkront, uten batching.
pub struct WorkoutStore<S: KeyValueStorage> {
    storage: S,
    workouts: Vec<Workout>,
    sort_mode: SortMode,
    metrics: Metrics,
}

impl<S: KeyValueStorage> WorkoutStore<S> {
    /// Tomt lager over gitt backend. Leser ingenting.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            workouts: Vec::new(),
            sort_mode: SortMode::default(),
            metrics: Metrics::new(),
        }
    }

    /// Som `new`, men laster inn eventuelle lagrede økter.
    pub fn open(storage: S) -> Result<Self, WorkoutError> {
        let mut store = Self::new(storage);
        store.load()?;
        Ok(store)
    }

    /// Primærlista i innsettingsrekkefølge.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Backend-innsyn, til tester og diagnostikk.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn find_index(&self, id: &str) -> Option<usize> {
        self.workouts.iter().position(|w| w.id == id)
    }

    /// Legg til bakerst (innsettingsrekkefølgen bevares) og lagre.
    pub fn add(&mut self, workout: Workout) -> Result<(), WorkoutError> {
        debug_assert!(
            self.get(&workout.id).is_none(),
            "duplikat id i lageret: {}",
            workout.id
        );
        self.workouts.push(workout);
        self.save()
    }

    /// Rediger en økt via patch (O(n)-oppslag på id). Avledet verdi
    /// beregnes på nytt og hele samlingen lagres. Ukjent id gir `NotFound`
    /// uten at noe skrives.
    pub fn update(&mut self, id: &str, patch: &WorkoutPatch) -> Result<&Workout, WorkoutError> {
        let idx = self
            .find_index(id)
            .ok_or_else(|| WorkoutError::NotFound(id.to_string()))?;
        if let Err(e) = self.workouts[idx].apply_patch(patch) {
            self.metrics.validation_reject_total.inc();
            return Err(e);
        }
        self.save()?;
        Ok(&self.workouts[idx])
    }

    /// Fjern en økt og returner den, så kalleren kan pensjonere
    /// tilhørende kartmarkør. Ukjent id gir `NotFound` uten skriving.
    pub fn remove(&mut self, id: &str) -> Result<Workout, WorkoutError> {
        let idx = self
            .find_index(id)
            .ok_or_else(|| WorkoutError::NotFound(id.to_string()))?;
        let removed = self.workouts.remove(idx);
        self.save()?;
        Ok(removed)
    }

    /// Tell et valg/fokus på økta. Kosmetisk teller, ingen lagring.
    pub fn register_click(&mut self, id: &str) -> Result<u64, WorkoutError> {
        let idx = self
            .find_index(id)
            .ok_or_else(|| WorkoutError::NotFound(id.to_string()))?;
        let workout = &mut self.workouts[idx];
        workout.register_click();
        Ok(workout.interaction_count)
    }

    /// Veksle sorteringsmodus og returner den nye.
    pub fn toggle_sort(&mut self) -> SortMode {
        self.sort_mode = match self.sort_mode {
            SortMode::Insertion => SortMode::ByDistanceAscending,
            SortMode::ByDistanceAscending => SortMode::Insertion,
        };
        self.metrics.sort_toggle_total.inc();
        self.sort_mode
    }

    /// Visningsrekkefølgen for gjeldende modus. Den sorterte visningen
    /// avledes ferskt fra primærlista ved hvert kall, den muteres aldri
    /// på egen hånd.
    pub fn view(&self) -> Vec<&Workout> {
        match self.sort_mode {
            SortMode::Insertion => self.workouts.iter().collect(),
            SortMode::ByDistanceAscending => self.sorted_by_distance(),
        }
    }

    fn sorted_by_distance(&self) -> Vec<&Workout> {
        let mut sorted: Vec<&Workout> = self.workouts.iter().collect();
        sorted.sort_by_key(|w| OrderedFloat(w.distance));
        sorted
    }

    /// Serialiser hele samlingen til begge nøklene. Den sorterte kopien
    /// skrives for kompatibilitet med blob-formatet, men leses aldri tilbake.
    pub fn save(&mut self) -> Result<(), WorkoutError> {
        let primary = serde_json::to_string(&self.workouts)
            .map_err(|e| WorkoutError::Storage(e.to_string()))?;
        let secondary = serde_json::to_string(&self.sorted_by_distance())
            .map_err(|e| WorkoutError::Storage(e.to_string()))?;

        self.storage.set(KEY_WORKOUTS, &primary)?;
        self.storage.set(KEY_WORKOUTS_SORT, &secondary)?;
        self.metrics.persist_total.inc();
        debug!("Lagret {} økter", self.workouts.len());
        Ok(())
    }

    /// Les inn primærlista. Fraværende nøkkel gir tomt lager. Lagrede økter
    /// er rene data: formelvalget gjenopprettes fra kind-taggen og den
    /// avledede verdien beregnes på nytt, uavhengig av hva som sto i bloben.
    pub fn load(&mut self) -> Result<(), WorkoutError> {
        let Some(raw) = self.storage.get(KEY_WORKOUTS) else {
            debug!("Ingen lagrede økter, starter tomt");
            return Ok(());
        };

        let de = &mut serde_json::Deserializer::from_str(&raw);
        let mut workouts: Vec<Workout> = serde_path_to_error::deserialize(de)
            .map_err(|e| WorkoutError::Storage(e.to_string()))?;
        for workout in &mut workouts {
            workout.recompute();
        }

        info!("📂 Lastet {} økter fra lageret", workouts.len());
        self.workouts = workouts;
        self.metrics.load_total.inc();
        Ok(())
    }

    /// Tøm både lageret og minnet. Destruktivt og irreversibelt,
    /// eksponert som eksplisitt nullstilling.
    pub fn clear_all(&mut self) -> Result<(), WorkoutError> {
        self.storage.clear()?;
        self.workouts.clear();
        info!("🗑️ Nullstilte treningsloggen");
        Ok(())
    }
}
