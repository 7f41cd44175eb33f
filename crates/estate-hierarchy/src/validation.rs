//! Referential validator.
//!
//! Checks a candidate record against a [`HierarchySnapshot`] before it is
//! written. Every check is scoped to the candidate's own level and its
//! immediate parent level; nothing walks further up or down the tree.
//!
//! Checks run in a fixed order and stop at the first violation: parent
//! existence, identifier uniqueness, required fields, then the lease
//! condition on buildings.

use estate_core::models::{Building, Entity};

use crate::error::{Violation, ViolationKind};
use crate::snapshot::HierarchySnapshot;

/// Validate a record that is about to be created.
pub fn validate_create(candidate: &Entity, snapshot: &HierarchySnapshot) -> Result<(), Violation> {
    check_parent(candidate, snapshot)?;
    check_unique(candidate, snapshot)?;
    validate_fields(candidate)
}

/// Checks that depend only on the record itself.
///
/// Also used when re-validating a record after an update.
pub fn validate_fields(candidate: &Entity) -> Result<(), Violation> {
    check_required(candidate)?;
    if let Entity::Building(building) = candidate {
        check_lease(building)?;
    }
    Ok(())
}

fn check_parent(candidate: &Entity, snapshot: &HierarchySnapshot) -> Result<(), Violation> {
    let level = candidate.level();
    let (Some(parent_level), Some(field)) = (level.parent(), level.parent_field()) else {
        return Ok(());
    };
    let parent_id = candidate.parent_id().unwrap_or_default();

    if parent_id.trim().is_empty() {
        return Err(Violation::new(
            ViolationKind::MissingParent,
            Some(field),
            format!("{field} is required"),
        ));
    }
    if !snapshot.contains(parent_level, parent_id) {
        return Err(Violation::new(
            ViolationKind::MissingParent,
            Some(field),
            format!(
                "{} '{parent_id}' does not exist",
                parent_level.label().to_lowercase()
            ),
        ));
    }
    Ok(())
}

fn check_unique(candidate: &Entity, snapshot: &HierarchySnapshot) -> Result<(), Violation> {
    let id = candidate.id();
    if !id.is_empty() && snapshot.contains(candidate.level(), id) {
        return Err(duplicate_id(candidate));
    }
    Ok(())
}

/// The violation reported when a record's id is already taken.
pub(crate) fn duplicate_id(candidate: &Entity) -> Violation {
    Violation::new(
        ViolationKind::DuplicateIdentifier,
        Some("id"),
        format!(
            "{} id '{}' is already in use",
            candidate.level().label().to_lowercase(),
            candidate.id()
        ),
    )
}

fn check_required(candidate: &Entity) -> Result<(), Violation> {
    let field = match candidate {
        Entity::Floor(_) => "floorNumber",
        _ => "name",
    };
    if candidate.display_name().trim().is_empty() {
        return Err(Violation::new(
            ViolationKind::MissingRequiredField,
            Some(field),
            format!("{field} must not be empty"),
        ));
    }
    Ok(())
}

fn check_lease(building: &Building) -> Result<(), Violation> {
    match (building.is_leased(), building.lease_details.is_some()) {
        (true, false) => Err(Violation::new(
            ViolationKind::ConditionalFieldMismatch,
            Some("leaseDetails"),
            "leased buildings require lease details",
        )),
        (false, true) => Err(Violation::new(
            ViolationKind::ConditionalFieldMismatch,
            Some("leaseDetails"),
            "owned buildings must not carry lease details",
        )),
        _ => Ok(()),
    }
}
