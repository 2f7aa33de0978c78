//! Profile list rendering

use crate::types::Profile;

/// A container of displayed profile entries.
///
/// The controller only ever clears it and appends to it, so any target that
/// can do those two things can be rendered into.
pub trait ProfileList {
    fn clear(&mut self);
    fn append(&mut self, profile: Profile);
}

/// Replace everything in `list` with `profiles`, keeping their order
pub fn render_profiles<L: ProfileList + ?Sized>(list: &mut L, profiles: Vec<Profile>) {
    list.clear();
    for profile in profiles {
        list.append(profile);
    }
}

/// The list the profile panel draws from every frame
#[derive(Debug, Default)]
pub struct ProfileListState {
    items: Vec<Profile>,
}

impl ProfileListState {
    pub fn items(&self) -> &[Profile] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ProfileList for ProfileListState {
    fn clear(&mut self) {
        self.items.clear();
    }

    fn append(&mut self, profile: Profile) {
        self.items.push(profile);
    }
}
