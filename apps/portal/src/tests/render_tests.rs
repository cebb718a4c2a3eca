use super::*;
use shared::domain::RowNumber;

fn registrant(row: i64, name: &str, status: &str, accredit: &str) -> Registrant {
    Registrant {
        full_name: name.into(),
        email: format!("{}@example.com", name.to_lowercase()),
        upline_director: "Dee".into(),
        upline_world_team: "North".into(),
        status: status.into(),
        accredit: accredit.into(),
        row_number: RowNumber(row),
    }
}

#[test]
fn table_marks_active_sort_column() {
    let a = registrant(2, "Ann", "Director", "");
    let b = registrant(3, "Ben", "Diamond", "1");
    let out = render_table(
        &[&a, &b],
        SortSpec::new(SortField::Status, SortDirection::Descending),
        None,
    );

    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("Status ▼"));
    assert!(!lines[0].contains("Full Name ▲"));
    assert!(lines[2].starts_with("2 "));
    assert!(lines[2].contains("Pending"));
    assert!(lines[2].contains("success"));
    assert!(lines[3].contains("Accredited"));
    assert!(lines[3].contains("gold"));
}

#[test]
fn empty_state_replaces_table() {
    let out = render_table(&[], SortSpec::default(), Some(EmptyState::NoMatches));
    assert_eq!(out, "No registrants found matching your search.\n");
}

#[test]
fn long_cells_are_truncated() {
    let long = registrant(2, &"x".repeat(40), "", "");
    let out = render_table(&[&long], SortSpec::default(), None);
    assert!(out.contains('…'));
    assert!(!out.contains(&"x".repeat(MAX_CELL)));
}

#[test]
fn footer_and_stats_report_counts() {
    let stats = RosterStats {
        total: 5,
        accredited: 2,
        pending: 3,
        completion_rate: 40,
    };
    assert_eq!(
        render_footer(1, &stats),
        "Showing 1 of 5 registrants | 2 accredited | 3 pending\n"
    );
    assert!(render_stats(&stats).contains("Completion rate:   40%"));
}

#[test]
fn prompt_shows_processing_when_busy() {
    let prompt = ConfirmationPrompt {
        row_number: RowNumber(2),
        full_name: "Ann",
        email: "ann@example.com",
        status: "Team",
        busy: true,
    };
    let out = render_prompt(&prompt);
    assert!(out.contains("accredit Ann?"));
    assert!(out.contains("ann@example.com"));
    assert!(out.ends_with("Processing...\n"));
}
