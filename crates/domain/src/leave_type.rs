// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave type reference data.
//!
//! Leave types are owned by HR configuration. The engine only reads them
//! to decide approval, document, carry-over and notification behavior.

use crate::error::DomainError;
use crate::types::{Days, LeaveTypeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-category rules attached to a leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeRules {
    /// Requests must be approved before they count as used.
    pub requires_approval: bool,
    /// Requests must carry a supporting document.
    pub requires_document: bool,
    /// Paid or unpaid leave.
    pub is_paid: bool,
    /// Unused days may migrate into the next year.
    pub can_carry_over: bool,
    /// Upper bound on days migrated into the next year.
    pub max_carry_over_days: Days,
    /// Annual cap on days taken; zero means unlimited.
    pub max_days_per_year: Days,
    /// Lead time in days before the start date at which the manager is alerted.
    pub notification_days: u32,
    /// Count weekend days toward the request length.
    #[serde(default)]
    pub counts_weekends: bool,
}

impl LeaveTypeRules {
    /// Checks that the configured quantities are non-negative.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NegativeQuantity` for a negative cap.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_carry_over_days.is_negative() {
            return Err(DomainError::NegativeQuantity {
                field: "max_carry_over_days",
                value: self.max_carry_over_days,
            });
        }
        if self.max_days_per_year.is_negative() {
            return Err(DomainError::NegativeQuantity {
                field: "max_days_per_year",
                value: self.max_days_per_year,
            });
        }
        Ok(())
    }

    /// The carry-over cap, or `None` if the type does not carry over.
    #[must_use]
    pub const fn carry_over_cap(&self) -> Option<Days> {
        if self.can_carry_over {
            Some(self.max_carry_over_days)
        } else {
            None
        }
    }

    /// The annual cap, or `None` when unlimited.
    #[must_use]
    pub fn annual_cap(&self) -> Option<Days> {
        if self.max_days_per_year.is_positive() {
            Some(self.max_days_per_year)
        } else {
            None
        }
    }
}

/// A registered leave category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    /// The persisted identifier.
    pub id: LeaveTypeId,
    /// Display name, unique across types.
    pub name: String,
    /// Category rules.
    pub rules: LeaveTypeRules,
    /// Inactive types accept no new requests.
    pub is_active: bool,
}

/// In-memory view over the configured leave types.
#[derive(Debug, Clone, Default)]
pub struct LeaveTypeRegistry {
    types: BTreeMap<LeaveTypeId, LeaveType>,
}

impl LeaveTypeRegistry {
    /// Builds a registry from loaded leave types.
    #[must_use]
    pub fn new(types: impl IntoIterator<Item = LeaveType>) -> Self {
        Self {
            types: types.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    /// Looks up a type by id.
    #[must_use]
    pub fn get(&self, id: LeaveTypeId) -> Option<&LeaveType> {
        self.types.get(&id)
    }

    /// Looks up a type by its name, ignoring case.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&LeaveType> {
        self.types
            .values()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Iterates over active types in id order.
    pub fn active(&self) -> impl Iterator<Item = &LeaveType> {
        self.types.values().filter(|t| t.is_active)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rules() -> LeaveTypeRules {
        LeaveTypeRules {
            requires_approval: true,
            requires_document: false,
            is_paid: true,
            can_carry_over: true,
            max_carry_over_days: Days::whole(5),
            max_days_per_year: Days::ZERO,
            notification_days: 7,
            counts_weekends: false,
        }
    }

    #[test]
    fn test_annual_cap_zero_is_unlimited() {
        assert_eq!(rules().annual_cap(), None);

        let mut capped = rules();
        capped.max_days_per_year = Days::whole(20);
        assert_eq!(capped.annual_cap(), Some(Days::whole(20)));
    }

    #[test]
    fn test_carry_over_cap_requires_flag() {
        assert_eq!(rules().carry_over_cap(), Some(Days::whole(5)));

        let mut no_carry = rules();
        no_carry.can_carry_over = false;
        assert_eq!(no_carry.carry_over_cap(), None);
    }

    #[test]
    fn test_validate_rejects_negative_caps() {
        let mut bad = rules();
        bad.max_carry_over_days = Days::new(dec!(-1));
        assert!(matches!(
            bad.validate(),
            Err(DomainError::NegativeQuantity {
                field: "max_carry_over_days",
                ..
            })
        ));
    }

    #[test]
    fn test_registry_lookup_by_name_and_active() {
        let registry = LeaveTypeRegistry::new(vec![
            LeaveType {
                id: LeaveTypeId::new(1),
                name: String::from("Annual"),
                rules: rules(),
                is_active: true,
            },
            LeaveType {
                id: LeaveTypeId::new(2),
                name: String::from("Sabbatical"),
                rules: rules(),
                is_active: false,
            },
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.by_name("annual").map(|t| t.id),
            Some(LeaveTypeId::new(1))
        );
        assert_eq!(registry.active().count(), 1);
        assert!(registry.get(LeaveTypeId::new(3)).is_none());
    }
}
