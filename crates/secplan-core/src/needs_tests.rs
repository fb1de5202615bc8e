use crate::availability::AvailabilityMap;
use crate::domain::{NeedKind, Period};
use crate::needs::{NeedIndex, ADMIN_NEED_GAP, STANDARD_ROLE_ID};
use crate::testing::fixtures::*;

#[test]
fn eligibility_rows_define_medical_needs_once() {
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 2);
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(secretary(1, "Durand"))
        .secretary(secretary(2, "Martin"))
        .available(1, day(0), &[Period::Am])
        .available(2, day(0), &[Period::Am])
        .need_with_candidates(spec, &[1, 2])
        .build();
    let availability = AvailabilityMap::from_rows(&data.availability);

    let index = NeedIndex::build(&data, &admin_blocks, &availability);

    assert_eq!(index.len(), 1);
    assert_eq!(index.admin_offset(), 1);
    let need = index.get(0);
    assert_eq!(need.kind, NeedKind::Medical);
    assert_eq!(need.gap, 2);
    assert_eq!(index.candidates(0), &[1, 2]);
}

#[test]
fn gap_rows_without_eligibility_are_indexed_with_zero_candidates() {
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
    let (data, admin_blocks) = WeekBuilder::new().need(spec).build();
    let availability = AvailabilityMap::from_rows(&data.availability);

    let index = NeedIndex::build(&data, &admin_blocks, &availability);

    assert_eq!(index.len(), 1);
    assert!(index.candidates(0).is_empty());
    assert_eq!(index.get(0).kind, NeedKind::Medical);
}

#[test]
fn duplicate_key_between_views_resolves_to_eligibility_row() {
    // Same (block, skill, role) in both views: indexed once, candidates
    // from the eligibility side.
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(secretary(1, "Durand"))
        .available(1, day(0), &[Period::Am])
        .need_with_candidates(spec, &[1])
        .build();
    let availability = AvailabilityMap::from_rows(&data.availability);

    let index = NeedIndex::build(&data, &admin_blocks, &availability);

    assert_eq!(index.len(), 1);
    assert_eq!(index.candidates(0), &[1]);
}

#[test]
fn same_block_with_two_skills_yields_two_needs() {
    let spec_a = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
    let spec_b = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 2, ROLE_STANDARD, 1);
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(secretary(1, "Durand"))
        .available(1, day(0), &[Period::Am])
        .need_with_candidates(spec_a, &[1])
        .need_with_candidates(spec_b, &[1])
        .build();
    let availability = AvailabilityMap::from_rows(&data.availability);

    let index = NeedIndex::build(&data, &admin_blocks, &availability);

    assert_eq!(index.len(), 2);
    assert_eq!(index.lookup(&(100, Some(1), Some(ROLE_STANDARD))), Some(0));
    assert_eq!(index.lookup(&(100, Some(2), Some(ROLE_STANDARD))), Some(1));
}

#[test]
fn admin_needs_follow_medical_and_take_available_staff() {
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(secretary(1, "Durand"))
        .secretary(secretary(2, "Martin"))
        .available(1, day(0), &[Period::Am, Period::Pm])
        .available(2, day(0), &[Period::Pm])
        .need_with_candidates(spec, &[1])
        .admin_block(9000, day(0), Period::Am)
        .admin_block(9001, day(0), Period::Pm)
        .build();
    let availability = AvailabilityMap::from_rows(&data.availability);

    let index = NeedIndex::build(&data, &admin_blocks, &availability);

    assert_eq!(index.len(), 3);
    assert_eq!(index.admin_offset(), 1);
    assert_eq!(index.medical().len(), 1);
    assert_eq!(index.admin().len(), 2);

    let am_admin = index.get(1);
    assert_eq!(am_admin.kind, NeedKind::Admin);
    assert_eq!(am_admin.gap, ADMIN_NEED_GAP);
    assert_eq!(am_admin.id_skill, None);
    assert_eq!(am_admin.id_role, Some(STANDARD_ROLE_ID));
    assert_eq!(index.candidates(1), &[1]);
    assert_eq!(index.candidates(2), &[1, 2]);
}

#[test]
fn admin_site_resolves_through_department() {
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(secretary(1, "Durand"))
        .available(1, day(0), &[Period::Am])
        .admin_block(9000, day(0), Period::Am)
        .build();
    let availability = AvailabilityMap::from_rows(&data.availability);

    let index = NeedIndex::build(&data, &admin_blocks, &availability);

    assert_eq!(index.get(0).id_site, Some(SITE_CENTRE));
}
