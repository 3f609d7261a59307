//! End-to-end play page scenarios and statistical AI checks

use glam::Vec2;
use sorry_pong::flow::{EndPhase, PlayFlow, Screen};
use sorry_pong::platform::MemoryClipboard;
use sorry_pong::sim::{Direction, MatchPhase, MatchState, Side, TickInput, tick};
use sorry_pong::tuning::MatchTuning;
use sorry_pong::{Category, GameInvite, Locale, PrizeList, Tuning, codec};

const FRAME_MS: f64 = 1000.0 / 60.0;
const MAX_MATCH_FRAMES: u64 = 200_000;

/// Move the player paddle toward the ball
fn track(state: &MatchState) -> Direction {
    let offset = state.ball.pos.y - state.player.center(state.tuning.paddle_height);
    if offset < -8.0 {
        Direction::Up
    } else if offset > 8.0 {
        Direction::Down
    } else {
        Direction::None
    }
}

/// Play one match with a tracking bot; returns the winner and points played
fn play_match(tuning: MatchTuning, seed: u64) -> (Option<Side>, u32) {
    let mut state = MatchState::new(tuning, vec!["SORRY!".to_string()], seed);
    let mut input = TickInput {
        start: true,
        ..Default::default()
    };

    while state.frames < MAX_MATCH_FRAMES {
        input.direction = track(&state);
        input.now_ms += FRAME_MS;
        tick(&mut state, &input);
        input.start = false;
        if matches!(state.phase, MatchPhase::Over { .. }) {
            break;
        }
    }
    (state.winner(), state.recipient_score + state.sender_score)
}

#[test]
fn test_always_correct_ai_still_terminates() {
    let tuning = MatchTuning {
        ai_wrong_direction_probability: 0.0,
        ..Default::default()
    };
    for seed in 0..10 {
        let (winner, points) = play_match(tuning.clone(), seed);
        assert!(winner.is_some(), "seed {seed} did not finish");
        assert!(points >= 10);
    }
}

#[test]
fn test_always_wrong_ai_favors_recipient() {
    let tuning = MatchTuning {
        ai_wrong_direction_probability: 1.0,
        ..Default::default()
    };

    let mut recipient_wins = 0;
    let mut matches = 0;
    let mut points = 0;
    let mut seed = 1000;
    while points < 1000 {
        let (winner, played) = play_match(tuning.clone(), seed);
        if winner == Some(Side::Recipient) {
            recipient_wins += 1;
        }
        matches += 1;
        points += played;
        seed += 1;
    }

    let rate = recipient_wins as f64 / matches as f64;
    assert!(rate > 0.8, "recipient won {recipient_wins}/{matches}");
}

fn alex_invite() -> GameInvite {
    GameInvite::new("Alex", "Sam", "being late")
        .with_locale(Locale::En)
        .with_category(Category::Apology)
}

/// Ball about to leave past the AI with the recipient one point short
fn force_recipient_point(flow: &mut PlayFlow<MemoryClipboard>) {
    let game = flow.game_mut();
    game.tuning.ai_speed_min = 0.0;
    game.tuning.ai_speed_max = 0.0;
    game.ai.y = 0.0;
    game.ball.pos = Vec2::new(game.tuning.court_width - 2.0, game.tuning.court_height - 10.0);
    game.ball.vel = Vec2::new(4.0, 0.0);
}

#[test]
fn test_alex_and_sam_round_trip_into_apology_reveal() {
    let invite = alex_invite();
    let token = codec::encode(&invite);
    let decoded = codec::decode(&token).unwrap();
    assert_eq!(decoded, invite);

    let query = format!("?d={token}");
    let mut flow = PlayFlow::from_query(&query, Tuning::default(), MemoryClipboard::default(), 5);
    assert_eq!(flow.screen(), Screen::PreGame);
    flow.start_match();

    let mut now = 0.0;
    for expected in 1..=10 {
        force_recipient_point(&mut flow);
        now += FRAME_MS;
        flow.frame(now);
        assert_eq!(flow.game().recipient_score, expected);
    }

    assert_eq!(flow.game().sender_score, 0);
    assert_eq!(flow.game().winner(), Some(Side::Recipient));
    assert_eq!(flow.screen(), Screen::Ended(EndPhase::ApologyReveal));
    assert_eq!(flow.lines()[2], "I am sorry for being late");
}

#[test]
fn test_legacy_query_string() {
    let invite = codec::invite_from_query("?sender=Alex&recipient=Sam&reason=lateness").unwrap();
    assert_eq!(invite.sender, "Alex");
    assert_eq!(invite.recipient, "Sam");
    assert_eq!(invite.message, "lateness");
    assert_eq!(invite.category, Category::Apology);
    assert_eq!(invite.locale, Locale::En);

    let flow = PlayFlow::from_query(
        "?sender=Alex&recipient=Sam&reason=lateness",
        Tuning::default(),
        MemoryClipboard::default(),
        1,
    );
    assert_eq!(flow.screen(), Screen::PreGame);
}

#[test]
fn test_garbage_link_shows_invalid_screen() {
    let flow = PlayFlow::from_query(
        "?d=not-valid-base64!!!",
        Tuning::default(),
        MemoryClipboard::default(),
        1,
    );
    assert_eq!(flow.screen(), Screen::InvalidLink);
    assert_eq!(flow.lines().len(), 3);
}

#[test]
fn test_custom_prize_reaches_the_clipboard() {
    let prizes = PrizeList::from_vec(
        ["一", "二", "三", "四", "五", "六"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
    .unwrap();
    let invite = GameInvite::new("小明", "小红", "忘了你的生日")
        .with_locale(Locale::Zh)
        .with_prizes(prizes);
    let link = codec::play_url("https://example.com", &invite);

    let mut tuning = Tuning::short_match();
    tuning.wheel.decel_duration_ms = 100.0;
    let query = link.split_once('?').unwrap().1;
    let mut flow = PlayFlow::from_query(query, tuning, MemoryClipboard::default(), 11);
    flow.trigger_primary();

    let mut now = 0.0;
    while flow.screen() == Screen::Playing {
        force_recipient_point(&mut flow);
        now += FRAME_MS;
        flow.frame(now);
    }
    assert_eq!(flow.game().recipient_score, 5);

    flow.advance_phase();
    flow.trigger_primary();
    for _ in 0..30 {
        now += FRAME_MS;
        flow.frame(now);
    }
    flow.advance_phase();
    while flow.screen() == Screen::Ended(EndPhase::Wheel) {
        now += FRAME_MS;
        flow.frame(now);
    }

    let segment = flow.prize_index().unwrap();
    let prize = flow.prize_text().unwrap();
    assert_eq!(prize, ["一", "二", "三", "四", "五", "六"][segment]);

    flow.advance_phase();
    flow.select_reply(2);
    flow.trigger_primary();
    let copied = flow.clipboard().contents.clone().unwrap();
    assert!(copied.contains(&prize));
    assert_eq!(flow.share_text(), Some(copied.as_str()));

    now += 1000.0;
    flow.frame(now);
    assert_eq!(flow.screen(), Screen::Ended(EndPhase::Success));
}
