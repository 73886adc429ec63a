use tasklet::context::{Action, AppContext, Outcome};
use tasklet::models::Filter;

fn add(ctx: &mut AppContext, text: &str, date: &str) -> u64 {
    match ctx
        .dispatch(Action::Add { text: text.into(), date: date.into() })
        .unwrap()
    {
        Outcome::Added(t) => t.id,
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_add_then_reload() {
    let mut ctx = AppContext::in_memory();
    add(&mut ctx, "Buy milk", "2024-01-01");

    let stored = ctx.registry().store().load();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].text, "Buy milk");
    assert_eq!(stored[0].date, "2024-01-01");
    assert!(!stored[0].completed);
}

#[test]
fn test_blank_add_raises_notice() {
    let mut ctx = AppContext::in_memory();
    let outcome = ctx
        .dispatch(Action::Add { text: "  ".into(), date: "2024-01-01".into() })
        .unwrap();

    assert_eq!(outcome, Outcome::Rejected("Please enter a task description.".into()));
    assert_eq!(ctx.notice(), Some("Please enter a task description."));
    assert!(ctx.registry().is_empty());
    assert!(ctx.registry().store().load().is_empty());

    ctx.dismiss_notice();
    assert_eq!(ctx.notice(), None);
}

#[test]
fn test_toggle_and_missing_targets() {
    let mut ctx = AppContext::in_memory();
    let id = add(&mut ctx, "Flip", "");

    assert_eq!(
        ctx.dispatch(Action::Toggle(id)).unwrap(),
        Outcome::Toggled { id, completed: true }
    );
    assert_eq!(ctx.dispatch(Action::Toggle(id + 1)).unwrap(), Outcome::Ignored);
    assert_eq!(ctx.dispatch(Action::Delete(id + 1)).unwrap(), Outcome::Ignored);
    assert_eq!(ctx.registry().len(), 1);
}

#[test]
fn test_delete_all_needs_confirmation() {
    let mut ctx = AppContext::in_memory();
    add(&mut ctx, "One", "");
    add(&mut ctx, "Two", "");

    // A stray confirmation does nothing.
    assert_eq!(ctx.dispatch(Action::ConfirmDeleteAll).unwrap(), Outcome::Ignored);
    assert_eq!(ctx.registry().len(), 2);

    assert_eq!(
        ctx.dispatch(Action::RequestDeleteAll).unwrap(),
        Outcome::ConfirmationRequired
    );
    assert!(ctx.awaiting_confirmation());
    assert_eq!(ctx.registry().len(), 2);

    ctx.dispatch(Action::CancelDeleteAll).unwrap();
    assert!(!ctx.awaiting_confirmation());
    assert_eq!(ctx.registry().len(), 2);

    ctx.dispatch(Action::RequestDeleteAll).unwrap();
    assert_eq!(ctx.dispatch(Action::ConfirmDeleteAll).unwrap(), Outcome::Cleared);
    assert!(ctx.registry().store().load().is_empty());

    for f in Filter::ALL {
        ctx.dispatch(Action::SetFilter(f)).unwrap();
        assert!(ctx.view().show_empty_notice);
    }
}

#[test]
fn test_view_under_all_matches_store() {
    let mut ctx = AppContext::in_memory();
    let a = add(&mut ctx, "A", "");
    let b = add(&mut ctx, "B", "2024-05-05");
    let c = add(&mut ctx, "C", "");
    ctx.dispatch(Action::Toggle(b)).unwrap();
    ctx.dispatch(Action::Delete(a)).unwrap();

    let stored: Vec<u64> = ctx.registry().store().load().iter().map(|t| t.id).collect();
    assert_eq!(ctx.view().visible_ids(), stored);
    assert_eq!(stored, vec![b, c]);

    ctx.dispatch(Action::SetFilter(Filter::Completed)).unwrap();
    assert_eq!(ctx.filter(), Filter::Completed);
    assert_eq!(ctx.view().visible_ids(), vec![b]);
}
