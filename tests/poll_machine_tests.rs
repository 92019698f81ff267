use nightconv::api::{PollResult, SubmitReply, TaskHandle};
use nightconv::poll::{ConversionState, ConversionStatus, PollMachine};
use nightconv::ConversionError;
use std::time::Duration;

fn polling(task: &str) -> PollMachine {
    let mut machine = PollMachine::new(Duration::from_millis(5));
    machine.on_submit(Ok(SubmitReply::Accepted(TaskHandle::new(task))));
    machine
}

#[test]
fn test_status_strings() {
    assert_eq!(ConversionStatus::from_position(5).to_string(), "4 Ahead");
    assert_eq!(ConversionStatus::from_position(2).to_string(), "1 Ahead");
    assert_eq!(ConversionStatus::from_position(1).to_string(), "Converting");
    assert_eq!(ConversionStatus::from_position(0), ConversionStatus::Converting);
    assert_eq!(ConversionStatus::from_position(40), ConversionStatus::Queued { ahead: 39 });
}

#[test]
fn test_accepted_submission_starts_polling() {
    let machine = polling("T1");

    assert_eq!(machine.pending_task().map(|t| t.as_str()), Some("T1"));
    assert_eq!(
        machine.state(),
        &ConversionState::Polling { task: TaskHandle::new("T1"), checks: 0 }
    );
    assert!(machine.outcome().is_none());
    assert_eq!(machine.interval(), Duration::from_millis(5));
}

#[test]
fn test_rejected_submission_fails() {
    let mut machine = PollMachine::new(Duration::ZERO);
    machine.on_submit(Ok(SubmitReply::Rejected("Bad object ID".to_string())));

    assert!(machine.state().is_terminal());
    assert!(machine.pending_task().is_none());
    assert_eq!(
        machine.outcome(),
        Some(Err(ConversionError::ServerError("Bad object ID".to_string())))
    );
}

#[test]
fn test_pending_checks_count_up_and_report() {
    let mut machine = polling("T1");

    assert_eq!(
        machine.on_check(Ok(PollResult::Pending { position: 3 })),
        Some(ConversionStatus::Queued { ahead: 2 })
    );
    assert_eq!(
        machine.on_check(Ok(PollResult::Pending { position: 1 })),
        Some(ConversionStatus::Converting)
    );
    assert_eq!(
        machine.state(),
        &ConversionState::Polling { task: TaskHandle::new("T1"), checks: 2 }
    );
}

#[test]
fn test_complete_is_terminal_and_absorbing() {
    let mut machine = polling("T1");

    assert_eq!(machine.on_check(Ok(PollResult::Complete { file_id: "abc123".into() })), None);
    assert_eq!(machine.outcome(), Some(Ok("abc123".to_string())));

    // Later input can't move a finished conversion.
    assert_eq!(machine.on_check(Ok(PollResult::Pending { position: 2 })), None);
    machine.on_submit(Ok(SubmitReply::Accepted(TaskHandle::new("T2"))));
    assert_eq!(machine.outcome(), Some(Ok("abc123".to_string())));
}

#[test]
fn test_failed_check_and_parse_error() {
    let mut machine = polling("T1");
    machine.on_check(Ok(PollResult::Failed { detail: "No such task was found.".into() }));
    assert_eq!(
        machine.outcome(),
        Some(Err(ConversionError::ServerError("No such task was found.".to_string())))
    );

    let mut machine = polling("T1");
    machine.on_check(Err(ConversionError::UnexpectedResponse("oops".into())));
    assert_eq!(
        machine.state(),
        &ConversionState::Failed(ConversionError::UnexpectedResponse("oops".into()))
    );
}

#[test]
fn test_check_before_submission_is_ignored() {
    let mut machine = PollMachine::new(Duration::ZERO);
    assert_eq!(machine.on_check(Ok(PollResult::Pending { position: 2 })), None);
    assert_eq!(machine.state(), &ConversionState::Submitted);
}

#[test]
fn test_submission_never_leaves_machine_idle() {
    let replies = vec![
        Ok(SubmitReply::Accepted(TaskHandle::new("T1"))),
        Ok(SubmitReply::Rejected("Too many requests".to_string())),
        Err(ConversionError::UnexpectedResponse("<html>".to_string())),
        Err(ConversionError::Transport("connection refused".to_string())),
    ];

    for reply in replies {
        let mut machine = PollMachine::new(Duration::ZERO);
        machine.on_submit(reply);
        assert!(
            machine.pending_task().is_some() || machine.outcome().is_some(),
            "machine left in {:?}",
            machine.state()
        );
    }

    // Every check result either keeps polling or ends the conversion.
    for result in [
        Ok(PollResult::Pending { position: 3 }),
        Ok(PollResult::Complete { file_id: "f".into() }),
        Ok(PollResult::Failed { detail: "gone".into() }),
        Err(ConversionError::UnexpectedResponse("x".into())),
    ] {
        let mut machine = polling("T1");
        machine.on_check(result);
        assert!(machine.pending_task().is_some() || machine.outcome().is_some());
    }
}
