use crate::config::MAX_TANKS;
use heapless::Vec;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TankDescriptor {
    pub name: String,
    /// Backend identifier, empty until `SET_TANK_IDS:` supplies it
    pub id: String,
}

/// Bounded, ordered list of tanks plus the current selection.
///
/// Names and ids arrive in separate commands and are paired by position.
/// The selection is only an id; it is never checked against the list.
#[derive(Debug, Default)]
pub struct TankRegistry {
    tanks: Vec<TankDescriptor, MAX_TANKS>,
    selected: String,
}

impl TankRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the names, keeping any id already at the same position.
    /// Names beyond capacity are dropped. Returns the number accepted.
    pub fn set_names<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tanks = Vec::new();
        for (index, name) in names.into_iter().take(MAX_TANKS).enumerate() {
            let id = self
                .tanks
                .get(index)
                .map(|tank| tank.id.clone())
                .unwrap_or_default();
            let _ = tanks.push(TankDescriptor {
                name: name.into(),
                id,
            });
        }
        self.tanks = tanks;
        self.tanks.len()
    }

    /// Replace the ids by position. Entries past the new list lose their id;
    /// extra ids append unnamed entries. Returns the number accepted.
    pub fn set_ids<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tank in self.tanks.iter_mut() {
            tank.id.clear();
        }

        let mut accepted = 0;
        for (index, id) in ids.into_iter().take(MAX_TANKS).enumerate() {
            match self.tanks.get_mut(index) {
                Some(tank) => tank.id = id.into(),
                None => {
                    let _ = self.tanks.push(TankDescriptor {
                        name: String::new(),
                        id: id.into(),
                    });
                }
            }
            accepted += 1;
        }
        accepted
    }

    /// Record `id` as the current selection, replacing any previous one
    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = id.into();
    }

    /// Current selection, `None` when nothing (or an empty id) was selected
    pub fn selected(&self) -> Option<&str> {
        if self.selected.is_empty() {
            None
        } else {
            Some(&self.selected)
        }
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.tanks.iter().any(|tank| tank.id == id)
    }

    pub fn tanks(&self) -> &[TankDescriptor] {
        &self.tanks
    }

    pub fn len(&self) -> usize {
        self.tanks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty()
    }
}
