use chrono::NaiveDate;
use spendly_core::{
    build_summary, init,
    onboarding::OnboardingFlow,
    period::{Direction, PeriodSelection, PeriodType},
};

#[test]
fn core_smoke() {
    init();

    let mut selection = PeriodSelection::new(
        PeriodType::Month,
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
    );
    assert_eq!(selection.label(), "January 2026");
    selection.navigate(Direction::Next);
    assert_eq!(selection.range().start_ymd(), "2026-02-01");

    let flow = OnboardingFlow::new();
    flow.next();
    assert_eq!(flow.step().index(), 1);

    assert!(build_summary().starts_with(env!("CARGO_PKG_VERSION")));
}
