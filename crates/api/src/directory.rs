// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Person and department lookups.
//!
//! People and departments are owned by another system. The engine only asks
//! whether a person exists, which department they belong to and who belongs
//! to a department.

use leave_ledger_domain::{DepartmentId, PersonId};
use std::collections::BTreeMap;

/// Read-only view of the person directory.
pub trait PersonDirectory: Send {
    /// Whether the person is known.
    fn contains(&self, person: PersonId) -> bool;

    /// The person's department, if any.
    fn department_of(&self, person: PersonId) -> Option<DepartmentId>;

    /// Everyone in the department, in id order.
    fn members_of(&self, department: DepartmentId) -> Vec<PersonId>;
}

/// A directory held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    people: BTreeMap<PersonId, Option<DepartmentId>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or moves a person.
    pub fn insert(&mut self, person: PersonId, department: Option<DepartmentId>) {
        self.people.insert(person, department);
    }

    /// Builder form of `insert`.
    #[must_use]
    pub fn with_person(mut self, person: PersonId, department: Option<DepartmentId>) -> Self {
        self.insert(person, department);
        self
    }

    /// Removes a person.
    pub fn remove(&mut self, person: PersonId) {
        self.people.remove(&person);
    }
}

impl FromIterator<(PersonId, Option<DepartmentId>)> for InMemoryDirectory {
    fn from_iter<I: IntoIterator<Item = (PersonId, Option<DepartmentId>)>>(iter: I) -> Self {
        Self {
            people: iter.into_iter().collect(),
        }
    }
}

impl PersonDirectory for InMemoryDirectory {
    fn contains(&self, person: PersonId) -> bool {
        self.people.contains_key(&person)
    }

    fn department_of(&self, person: PersonId) -> Option<DepartmentId> {
        self.people.get(&person).copied().flatten()
    }

    fn members_of(&self, department: DepartmentId) -> Vec<PersonId> {
        self.people
            .iter()
            .filter(|(_, d)| **d == Some(department))
            .map(|(p, _)| *p)
            .collect()
    }
}
