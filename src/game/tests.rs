use std::time::Duration;

use super::*;
use crate::config::GameConfig;
use crate::session::SessionStore;

fn create_test_service() -> GameService {
    GameService::new(SessionStore::new(), GameConfig::default())
}

fn create_service_with(config: GameConfig) -> GameService {
    GameService::new(SessionStore::new(), config)
}

// Reads the expected judgment for the current problem
async fn answer_key(service: &GameService, player_id: &str) -> bool {
    let handle = service.store().get(player_id).unwrap();
    handle.lock().await.current_answer_is_correct
}

async fn answer_right(service: &GameService, player_id: &str) -> AnswerOutcome {
    let judgment = answer_key(service, player_id).await;
    service.submit_answer(player_id, judgment).await.unwrap()
}

async fn answer_wrong(service: &GameService, player_id: &str) -> AnswerOutcome {
    let judgment = !answer_key(service, player_id).await;
    service.submit_answer(player_id, judgment).await.unwrap()
}

async fn time_left(service: &GameService, player_id: &str) -> u32 {
    service.status(player_id).await.unwrap().time_left
}

#[tokio::test(start_paused = true)]
async fn test_start_new_player() {
    let service = create_test_service();

    let start = service.start_game(Some("alice".into())).await.unwrap();
    assert_eq!(start.player_id, "alice");
    assert_eq!(start.time_left, 40);
    assert_eq!(start.score, 0);
    assert!(start.problem.contains(" = "));

    let status = service.status("alice").await.unwrap();
    assert!(status.active);
    assert_eq!(status.current_problem, Some(start.problem));
}

#[tokio::test(start_paused = true)]
async fn test_start_generates_player_id() {
    let service = create_test_service();

    let anonymous = service.start_game(None).await.unwrap();
    let blank = service.start_game(Some("   ".into())).await.unwrap();

    assert!(Uuid::parse_str(&anonymous.player_id).is_ok());
    assert!(Uuid::parse_str(&blank.player_id).is_ok());
    assert_ne!(anonymous.player_id, blank.player_id);
    assert_eq!(service.store().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_correct_answer_is_capped() {
    let service = create_test_service();
    service.start_game(Some("p".into())).await.unwrap();

    let outcome = answer_right(&service, "p").await;
    let AnswerOutcome::Continue {
        time_left,
        score,
        feedback,
        ..
    } = outcome
    else {
        panic!("expected the game to continue, got {outcome:?}");
    };
    assert_eq!(time_left, 40);
    assert_eq!(score, 1);
    assert_eq!(feedback, Feedback::Correct);

    let handle = service.store().get("p").unwrap();
    assert_eq!(handle.lock().await.top_score, 1);
}

#[tokio::test(start_paused = true)]
async fn test_wrong_then_correct() {
    let service = create_test_service();
    service.start_game(Some("p".into())).await.unwrap();

    let outcome = answer_wrong(&service, "p").await;
    assert!(matches!(
        outcome,
        AnswerOutcome::Continue {
            time_left: 30,
            score: 0,
            feedback: Feedback::Wrong,
            ..
        }
    ));

    let outcome = answer_right(&service, "p").await;
    assert!(matches!(
        outcome,
        AnswerOutcome::Continue {
            time_left: 35,
            score: 1,
            feedback: Feedback::Correct,
            ..
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_two_wrong_answers_remove_twenty_seconds() {
    let service = create_test_service();
    service.start_game(Some("p".into())).await.unwrap();

    answer_wrong(&service, "p").await;
    answer_wrong(&service, "p").await;

    assert_eq!(time_left(&service, "p").await, 20);
}

#[tokio::test(start_paused = true)]
async fn test_penalty_to_zero_ends_game() {
    let service = create_test_service();
    service.start_game(Some("p".into())).await.unwrap();
    answer_right(&service, "p").await;

    for _ in 0..3 {
        assert!(matches!(
            answer_wrong(&service, "p").await,
            AnswerOutcome::Continue { .. }
        ));
    }
    assert_eq!(
        answer_wrong(&service, "p").await,
        AnswerOutcome::GameOver { final_score: 1 }
    );

    let status = service.status("p").await.unwrap();
    assert!(!status.active);
    assert_eq!(status.time_left, 0);
    assert!(status.current_problem.is_none());

    // Further answers do not mutate the session
    assert_eq!(
        service.submit_answer("p", true).await.unwrap(),
        AnswerOutcome::GameOver { final_score: 1 }
    );
    assert_eq!(
        service.submit_answer("p", false).await.unwrap(),
        AnswerOutcome::GameOver { final_score: 1 }
    );
    let status = service.status("p").await.unwrap();
    assert_eq!((status.time_left, status.score), (0, 1));

    // The countdown notices the stop and exits without touching the clock
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let handle = service.store().get("p").unwrap();
    let session = handle.lock().await;
    assert!(session.stop_requested());
    assert!(!session.has_running_countdown());
    assert_eq!(session.time_left, 0);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_player() {
    let service = create_test_service();

    assert_eq!(
        service.submit_answer("ghost", true).await,
        Err(GameError::NotFound("ghost".into()))
    );
    assert_eq!(
        service.status("ghost").await,
        Err(GameError::NotFound("ghost".into()))
    );
}

#[tokio::test(start_paused = true)]
async fn test_blank_player_id_is_invalid() {
    let service = create_test_service();
    let required = GameError::InvalidRequest("player_id is required".into());

    assert_eq!(service.status("").await, Err(required.clone()));
    assert_eq!(service.submit_answer("  ", true).await, Err(required));
    assert!(service.store().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_restart_rolls_top_score() {
    let service = create_test_service();
    service.start_game(Some("p".into())).await.unwrap();
    for _ in 0..3 {
        answer_right(&service, "p").await;
    }

    let restart = service.start_game(Some("p".into())).await.unwrap();
    assert_eq!(restart.score, 0);
    assert_eq!(restart.time_left, 40);

    answer_right(&service, "p").await;
    let handle = service.store().get("p").unwrap();
    let session = handle.lock().await;
    assert_eq!(session.score, 1);
    assert_eq!(session.top_score, 3);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_decrements_once_per_second() {
    let service = create_test_service();
    service.start_game(Some("p".into())).await.unwrap();

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(time_left(&service, "p").await, 37);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(time_left(&service, "p").await, 35);
}

#[tokio::test(start_paused = true)]
async fn test_restart_keeps_a_single_countdown() {
    let service = create_test_service();
    service.start_game(Some("p".into())).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    for _ in 0..3 {
        service.start_game(Some("p".into())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    assert_eq!(time_left(&service, "p").await, 40);

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(time_left(&service, "p").await, 37);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_expiry_ends_game() {
    let service = create_service_with(GameConfig {
        max_time: 3,
        ..GameConfig::default()
    });
    service.start_game(Some("p".into())).await.unwrap();

    tokio::time::sleep(Duration::from_millis(3500)).await;
    let status = service.status("p").await.unwrap();
    assert!(!status.active);
    assert_eq!(status.time_left, 0);

    assert_eq!(
        service.submit_answer("p", true).await.unwrap(),
        AnswerOutcome::GameOver { final_score: 0 }
    );

    tokio::time::sleep(Duration::from_secs(5)).await;
    let handle = service.store().get("p").unwrap();
    let session = handle.lock().await;
    assert_eq!(session.time_left, 0);
    assert!(!session.has_running_countdown());
}

#[tokio::test(start_paused = true)]
async fn test_time_left_stays_in_bounds() {
    let service = create_test_service();
    service.start_game(Some("p".into())).await.unwrap();

    // Deterministic mix of right and wrong judgments with ticks in between
    for step in 0..60u32 {
        let outcome = if step % 3 == 0 {
            answer_wrong(&service, "p").await
        } else {
            answer_right(&service, "p").await
        };
        tokio::time::sleep(Duration::from_millis(700)).await;

        let handle = service.store().get("p").unwrap();
        let session = handle.lock().await;
        assert!(session.time_left <= 40);
        assert!(session.top_score >= session.score);
        if let AnswerOutcome::GameOver { .. } = outcome {
            assert!(!session.active);
            break;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_leaderboard_order() {
    let service = create_test_service();
    for (id, top) in [("a", 5), ("b", 2), ("c", 9)] {
        service.start_game(Some(id.into())).await.unwrap();
        let handle = service.store().get(id).unwrap();
        handle.lock().await.top_score = top;
    }

    let board = service.leaderboard().await;
    let scores: Vec<u32> = board.iter().map(|e| e.top_score).collect();
    let ids: Vec<&str> = board.iter().map(|e| e.player_id.as_str()).collect();
    assert_eq!(scores, vec![9, 5, 2]);
    assert_eq!(ids, vec!["c", "a", "b"]);
    assert!(board.iter().all(|e| e.active));
}

#[tokio::test(start_paused = true)]
async fn test_debug_report_counts() {
    let service = create_service_with(GameConfig {
        max_time: 2,
        ..GameConfig::default()
    });
    service.start_game(Some("early".into())).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    service.start_game(Some("late".into())).await.unwrap();

    let report = service.debug_report().await;
    assert_eq!(report.total_players, 2);
    assert_eq!(report.active_players, 1);
    let late = report
        .players
        .iter()
        .find(|p| p.player_id == "late")
        .unwrap();
    assert!(late.active);
    assert!(late.current_problem.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_sweep_evicts_finished_idle_player() {
    let service = create_service_with(GameConfig {
        max_time: 3,
        idle_timeout_secs: 10,
        ..GameConfig::default()
    });
    service.start_game(Some("idle".into())).await.unwrap();
    tokio::time::sleep(Duration::from_millis(3500)).await;

    // Idle for less than the threshold
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(service.sweep_idle().await, 0);

    service.start_game(Some("busy".into())).await.unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(service.sweep_idle().await, 1);

    assert_eq!(
        service.status("idle").await,
        Err(GameError::NotFound("idle".into()))
    );
    assert!(service.status("busy").await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_sweep_stops_running_countdown() {
    let service = create_service_with(GameConfig {
        idle_timeout_secs: 0,
        ..GameConfig::default()
    });
    service.start_game(Some("p".into())).await.unwrap();
    let handle = service.store().get("p").unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(service.sweep_idle().await, 1);
    assert!(service.store().get("p").is_none());

    let frozen = {
        let session = handle.lock().await;
        assert!(!session.active);
        assert!(session.countdown.is_none());
        session.time_left
    };
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.lock().await.time_left, frozen);

    // The evicted id starts over as a brand-new player
    let restart = service.start_game(Some("p".into())).await.unwrap();
    assert_eq!(restart.time_left, 40);
    assert!(!Arc::ptr_eq(&handle, &service.store().get("p").unwrap()));
}
