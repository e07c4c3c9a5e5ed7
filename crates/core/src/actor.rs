// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Who is performing a workflow step, and on whose behalf they may act.
//!
//! Approval authority is an explicit capability handed to the workflow by
//! the caller. The workflow never consults an organization chart.

use leave_ledger_domain::{DepartmentId, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The set of people an approver may decide for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproverScope {
    /// Everyone (HR).
    All,
    /// Members of the listed departments.
    Departments(BTreeSet<DepartmentId>),
    /// The listed people.
    People(BTreeSet<PersonId>),
}

/// A person holding approval authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approver {
    /// The approver's own identity.
    pub person_id: PersonId,
    /// Whom they may decide for.
    pub scope: ApproverScope,
}

impl Approver {
    /// Creates a new approver.
    #[must_use]
    pub const fn new(person_id: PersonId, scope: ApproverScope) -> Self {
        Self { person_id, scope }
    }

    /// Whether this approver may decide for `person` in `department`.
    ///
    /// # Arguments
    ///
    /// * `person` - The request owner
    /// * `department` - The owner's department, if known
    #[must_use]
    pub fn covers(&self, person: PersonId, department: Option<DepartmentId>) -> bool {
        match &self.scope {
            ApproverScope::All => true,
            ApproverScope::Departments(departments) => {
                department.is_some_and(|d| departments.contains(&d))
            }
            ApproverScope::People(people) => people.contains(&person),
        }
    }
}

/// The party performing a workflow step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Actor {
    /// A person without approval authority.
    Employee {
        /// The person's identity.
        person_id: PersonId,
    },
    /// A person holding approval authority.
    Approver(Approver),
    /// Scheduled processing.
    System,
}

impl Actor {
    /// The acting person, if any.
    #[must_use]
    pub const fn person_id(&self) -> Option<PersonId> {
        match self {
            Self::Employee { person_id } => Some(*person_id),
            Self::Approver(approver) => Some(approver.person_id),
            Self::System => None,
        }
    }

    /// Whether the actor is the given person.
    #[must_use]
    pub fn is(&self, person: PersonId) -> bool {
        self.person_id() == Some(person)
    }

    /// Whether the actor holds approval authority over the person.
    #[must_use]
    pub fn may_decide_for(&self, person: PersonId, department: Option<DepartmentId>) -> bool {
        match self {
            Self::Approver(approver) => approver.covers(person, department),
            Self::Employee { .. } | Self::System => false,
        }
    }

    /// Short label used in error messages and logs.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Employee { person_id } => format!("employee {person_id}"),
            Self::Approver(approver) => format!("approver {}", approver.person_id),
            Self::System => String::from("system"),
        }
    }
}
