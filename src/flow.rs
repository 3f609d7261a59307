//! Play page state machine
//!
//! Owns the match, the prize wheel and the post-match screens. The
//! presentation shell issues commands (d-pad, A, B) and re-renders from
//! [`PlayFlow::view`]; commands never return anything.
//!
//! ```text
//! PreGame -> Playing -> Ended(ApologyReveal -> [Wheel -> CouponReveal]
//!                             -> ReplySelection -> Success)
//!                    -> Ended(SenderWon) -> restart -> PreGame
//! ```

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::i18n::{self, Key, REPLY_COUNT, fill, t};
use crate::invite::GameInvite;
use crate::platform::{Clipboard, ClipboardError, CopyStatus};
use crate::sim::{
    Direction, MatchEvent, MatchSnapshot, MatchState, Side, TickInput, WheelPhase, WheelState,
    tick,
};
use crate::tuning::Tuning;

/// Longest message excerpt shown on the reveal screen (characters)
const MESSAGE_PREVIEW_CHARS: usize = 70;

/// Screens after the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndPhase {
    /// The AI won; only a restart is offered
    SenderWon,
    ApologyReveal,
    Wheel,
    CouponReveal,
    ReplySelection,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    /// The link did not decode; the only action is to create a new invite
    InvalidLink,
    PreGame,
    Playing,
    Ended(EndPhase),
}

/// Requests for the page-level router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Navigation {
    CreateInvite,
}

/// A reply button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyChoice {
    /// Stable key, independent of locale
    pub id: String,
    pub label: String,
}

/// Everything the shell renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowView {
    pub screen: Screen,
    #[serde(rename = "match")]
    pub game: MatchSnapshot,
    pub wheel_rotation: Option<f64>,
    pub wheel_phase: Option<WheelPhase>,
    pub prize: Option<String>,
    pub replies: Vec<ReplyChoice>,
    pub selected_reply: Option<usize>,
    pub copied: bool,
    /// A clipboard write is still settling
    pub copying: bool,
    pub copy_failed: bool,
    /// Localized text lines for the current screen
    pub lines: Vec<String>,
}

/// One play session
pub struct PlayFlow<C: Clipboard> {
    invite: GameInvite,
    tuning: Tuning,
    screen: Screen,
    game: MatchState,
    input: TickInput,
    wheel: Option<WheelState>,
    prize: Option<usize>,
    selected_reply: Option<usize>,
    copied: bool,
    copy_pending: bool,
    copy_failed: bool,
    share_text: Option<String>,
    /// When the success screen replaces the "copied" confirmation
    success_at: Option<f64>,
    now_ms: f64,
    events: Vec<MatchEvent>,
    navigation: Option<Navigation>,
    clipboard: C,
    rng: Pcg32,
}

impl<C: Clipboard> PlayFlow<C> {
    /// Start a session; `None` or an invite without names shows the
    /// invalid-link screen
    pub fn new(invite: Option<GameInvite>, tuning: Tuning, clipboard: C, seed: u64) -> Self {
        let (invite, screen) = match invite {
            Some(invite) if invite.is_playable() => (invite, Screen::PreGame),
            Some(_) => {
                log::warn!("Invite is missing sender or recipient");
                (GameInvite::default(), Screen::InvalidLink)
            }
            None => (GameInvite::default(), Screen::InvalidLink),
        };

        let mut rng = Pcg32::seed_from_u64(seed);
        let game = new_match(&invite, &tuning, rng.random());
        log::info!("Play session started ({:?})", screen);

        Self {
            invite,
            tuning,
            screen,
            game,
            input: TickInput::default(),
            wheel: None,
            prize: None,
            selected_reply: None,
            copied: false,
            copy_pending: false,
            copy_failed: false,
            share_text: None,
            success_at: None,
            now_ms: 0.0,
            events: Vec::new(),
            navigation: None,
            clipboard,
            rng,
        }
    }

    /// Start a session from the page's query string
    pub fn from_query(query: &str, tuning: Tuning, clipboard: C, seed: u64) -> Self {
        Self::new(codec::invite_from_query(query), tuning, clipboard, seed)
    }

    // === Commands ===

    pub fn move_player_up(&mut self) {
        self.steer(Direction::Up);
    }

    pub fn move_player_down(&mut self) {
        self.steer(Direction::Down);
    }

    pub fn stop_player_move(&mut self) {
        self.input.direction = Direction::None;
    }

    fn steer(&mut self, direction: Direction) {
        match self.screen {
            Screen::Playing => self.input.direction = direction,
            Screen::Ended(EndPhase::ReplySelection) if !self.copy_in_flight() => {
                let last = REPLY_COUNT - 1;
                let next = match (self.selected_reply, direction) {
                    (None, _) => 0,
                    (Some(i), Direction::Up) => i.saturating_sub(1),
                    (Some(i), Direction::Down) => (i + 1).min(last),
                    (Some(i), Direction::None) => i,
                };
                self.select_reply(next);
            }
            _ => {}
        }
    }

    pub fn start_match(&mut self) {
        if self.screen != Screen::PreGame {
            return;
        }
        self.screen = Screen::Playing;
        self.input.start = true;
    }

    /// The B button: forward through the reveal screens, back elsewhere,
    /// and "stop" while the wheel accelerates
    pub fn advance_phase(&mut self) {
        let Screen::Ended(phase) = self.screen else {
            return;
        };

        match phase {
            EndPhase::SenderWon => {}
            EndPhase::ApologyReveal => {
                if self.prize.is_some() {
                    self.enter(EndPhase::CouponReveal);
                } else if self.tuning.flow.wheel_enabled {
                    self.enter_wheel();
                } else {
                    self.enter(EndPhase::ReplySelection);
                }
            }
            EndPhase::Wheel => {
                let now = self.now_ms;
                match self.wheel.as_mut().map(|w| w.phase()) {
                    Some(WheelPhase::Accelerating) => {
                        if let Some(wheel) = self.wheel.as_mut() {
                            wheel.stop(now);
                        }
                    }
                    Some(WheelPhase::Decelerating) => {}
                    Some(WheelPhase::Idle) | None => {
                        self.wheel = None;
                        self.enter(EndPhase::ApologyReveal);
                    }
                }
            }
            EndPhase::CouponReveal => self.enter(EndPhase::ReplySelection),
            EndPhase::ReplySelection => {
                self.clear_reply();
                if self.prize.is_some() {
                    self.enter(EndPhase::CouponReveal);
                } else {
                    self.enter(EndPhase::ApologyReveal);
                }
            }
            EndPhase::Success => {
                self.copied = false;
                self.enter(EndPhase::ReplySelection);
            }
        }
    }

    /// The A button: start, spin, confirm, restart
    pub fn trigger_primary(&mut self) {
        match self.screen {
            Screen::InvalidLink => self.navigation = Some(Navigation::CreateInvite),
            Screen::PreGame => self.start_match(),
            Screen::Playing => {}
            Screen::Ended(EndPhase::SenderWon) => self.restart(),
            Screen::Ended(EndPhase::ApologyReveal) | Screen::Ended(EndPhase::CouponReveal) => {
                self.advance_phase()
            }
            Screen::Ended(EndPhase::Wheel) => {
                if let Some(wheel) = self.wheel.as_mut() {
                    wheel.spin();
                }
            }
            Screen::Ended(EndPhase::ReplySelection) => self.confirm_reply(),
            Screen::Ended(EndPhase::Success) => {}
        }
    }

    /// Pick a reply directly (pointer/touch)
    pub fn select_reply(&mut self, index: usize) {
        if self.screen != Screen::Ended(EndPhase::ReplySelection) || index >= REPLY_COUNT {
            return;
        }
        if self.copy_in_flight() {
            return;
        }
        self.selected_reply = Some(index);
        self.copy_failed = false;
    }

    /// Fresh match after the AI won
    pub fn restart(&mut self) {
        if self.screen == Screen::InvalidLink {
            return;
        }
        self.game = new_match(&self.invite, &self.tuning, self.rng.random());
        self.input = TickInput::default();
        self.wheel = None;
        self.prize = None;
        self.clear_reply();
        self.events.clear();
        self.screen = Screen::PreGame;
        log::info!("Match restarted");
    }

    /// Drop pending timers and queued events when the page goes away
    pub fn shutdown(&mut self) {
        self.success_at = None;
        self.copy_pending = false;
        self.events.clear();
        self.input = TickInput::default();
        log::info!("Play session closed");
    }

    /// Advance one display frame
    pub fn frame(&mut self, now_ms: f64) {
        self.now_ms = now_ms;

        match self.screen {
            Screen::Playing => {
                self.input.now_ms = now_ms;
                let events = tick(&mut self.game, &self.input);
                self.input.start = false;
                for event in events {
                    if let MatchEvent::MatchOver { winner } = event {
                        self.finish_match(winner);
                    }
                    self.events.push(event);
                }
            }
            Screen::Ended(EndPhase::Wheel) => {
                let landed = self.wheel.as_mut().and_then(|w| w.update(now_ms));
                if let Some(segment) = landed {
                    self.prize = Some(segment);
                    log::info!("Prize won: {}", self.invite.prize(segment));
                    self.enter(EndPhase::CouponReveal);
                }
            }
            Screen::Ended(EndPhase::ReplySelection) => {
                if self.copy_pending {
                    match self.clipboard.poll() {
                        Some(Ok(())) => self.copy_succeeded(),
                        Some(Err(e)) => self.copy_rejected(e),
                        None => {}
                    }
                }
                if self.success_at.is_some_and(|at| now_ms >= at) {
                    self.success_at = None;
                    self.copied = false;
                    self.enter(EndPhase::Success);
                }
            }
            _ => {}
        }
    }

    fn finish_match(&mut self, winner: Side) {
        self.input.direction = Direction::None;
        self.screen = match winner {
            Side::Recipient => Screen::Ended(EndPhase::ApologyReveal),
            Side::Sender => Screen::Ended(EndPhase::SenderWon),
        };
    }

    fn enter(&mut self, phase: EndPhase) {
        log::debug!("Entering {:?}", phase);
        self.screen = Screen::Ended(phase);
    }

    fn enter_wheel(&mut self) {
        let seed = self.rng.random();
        self.wheel = Some(WheelState::new(self.tuning.wheel.clone(), seed));
        self.enter(EndPhase::Wheel);
    }

    fn clear_reply(&mut self) {
        self.selected_reply = None;
        self.copied = false;
        self.copy_pending = false;
        self.copy_failed = false;
        self.success_at = None;
    }

    /// A copy was confirmed or is still settling
    fn copy_in_flight(&self) -> bool {
        self.copy_pending || self.success_at.is_some()
    }

    fn confirm_reply(&mut self) {
        if self.copy_in_flight() {
            return;
        }
        let Some(reply) = self.selected_reply else {
            log::debug!("No reply selected");
            return;
        };

        let text = self.share_message(reply);
        match self.clipboard.write_text(&text) {
            Ok(CopyStatus::Done) => self.copy_succeeded(),
            Ok(CopyStatus::Pending) => {
                log::debug!("Waiting for clipboard");
                self.copy_pending = true;
                self.copy_failed = false;
            }
            Err(e) => self.copy_rejected(e),
        }
        self.share_text = Some(text);
    }

    fn copy_succeeded(&mut self) {
        log::info!("Reply copied to clipboard");
        self.copy_pending = false;
        self.copied = true;
        self.copy_failed = false;
        self.success_at = Some(self.now_ms + self.tuning.flow.copy_grace_ms);
    }

    fn copy_rejected(&mut self, error: ClipboardError) {
        log::warn!("Failed to copy reply: {}", error);
        self.copy_pending = false;
        self.copied = false;
        self.copy_failed = true;
    }

    /// Final text for the chat app: the reply, plus the coupon if one was won
    pub fn share_message(&self, reply: usize) -> String {
        let locale = self.invite.locale;
        let options = i18n::reply_options(locale, self.invite.category);
        let reply_text = options[reply.min(REPLY_COUNT - 1)].text;

        match self.prize_text() {
            Some(prize) => {
                let coupon = fill(t(Key::CouponAppend, locale), &[("prize", prize.as_str())]);
                fill(
                    t(Key::ReplyShareMessage, locale),
                    &[("reply", reply_text), ("coupon", coupon.as_str())],
                )
            }
            None => reply_text.to_string(),
        }
    }

    // === Queries ===

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn invite(&self) -> &GameInvite {
        &self.invite
    }

    pub fn game(&self) -> &MatchState {
        &self.game
    }

    /// Direct access for harnesses that need to force match situations
    pub fn game_mut(&mut self) -> &mut MatchState {
        &mut self.game
    }

    pub fn wheel(&self) -> Option<&WheelState> {
        self.wheel.as_ref()
    }

    pub fn prize_index(&self) -> Option<usize> {
        self.prize
    }

    pub fn prize_text(&self) -> Option<String> {
        self.prize.map(|i| self.invite.prize(i))
    }

    pub fn selected_reply(&self) -> Option<usize> {
        self.selected_reply
    }

    pub fn copied(&self) -> bool {
        self.copied
    }

    pub fn copy_failed(&self) -> bool {
        self.copy_failed
    }

    /// A clipboard write is still settling
    pub fn copy_pending(&self) -> bool {
        self.copy_pending
    }

    /// Last text handed to the clipboard
    pub fn share_text(&self) -> Option<&str> {
        self.share_text.as_deref()
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut C {
        &mut self.clipboard
    }

    /// Match events since the last call (bubbles, points, hits)
    pub fn take_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn take_navigation(&mut self) -> Option<Navigation> {
        self.navigation.take()
    }

    pub fn view(&self) -> FlowView {
        let locale = self.invite.locale;
        let replies = i18n::reply_options(locale, self.invite.category)
            .iter()
            .map(|r| ReplyChoice {
                id: r.id.to_string(),
                label: r.short.to_string(),
            })
            .collect();

        FlowView {
            screen: self.screen,
            game: self.game.snapshot(),
            wheel_rotation: self.wheel.as_ref().map(|w| w.rotation),
            wheel_phase: self.wheel.as_ref().map(|w| w.phase()),
            prize: self.prize_text(),
            replies,
            selected_reply: self.selected_reply,
            copied: self.copied,
            copying: self.copy_pending,
            copy_failed: self.copy_failed,
            lines: self.lines(),
        }
    }

    /// Localized text for the current screen
    pub fn lines(&self) -> Vec<String> {
        let locale = self.invite.locale;
        let sender = self.invite.sender.as_str();
        let recipient = self.invite.recipient.as_str();
        let text = |key| t(key, locale).to_string();
        let named = |key, name: &str| fill(t(key, locale), &[("name", name)]);

        match self.screen {
            Screen::InvalidLink => vec![
                text(Key::InvalidLink),
                text(Key::InvalidLinkMessage),
                text(Key::CreateNewGame),
            ],
            Screen::PreGame => vec![
                named(Key::Hey, recipient),
                named(Key::SurpriseChallenge, sender),
                text(Key::PressToStart),
            ],
            Screen::Playing => vec![recipient.to_string(), sender.to_string()],
            Screen::Ended(EndPhase::SenderWon) => vec![
                text(Key::Oops),
                named(Key::SenderWonMessage, sender),
                text(Key::TryAgain),
            ],
            Screen::Ended(EndPhase::ApologyReveal) => vec![
                text(Key::YouWon),
                named(Key::HereIsWhatTheySaid, sender),
                fill(
                    i18n::message_heading(locale, self.invite.category),
                    &[("message", preview(&self.invite.message).as_str())],
                ),
                text(Key::WouldYouLikeToReply),
                text(Key::PressBToContinue),
            ],
            Screen::Ended(EndPhase::Wheel) => {
                let mut lines = vec![text(Key::SpinTheWheel), named(Key::WheelSubtitle, sender)];
                if self.wheel.as_ref().is_some_and(|w| w.phase() != WheelPhase::Idle) {
                    lines.push(text(Key::Spinning));
                }
                lines
            }
            Screen::Ended(EndPhase::CouponReveal) => vec![
                named(Key::CouponFrom, sender),
                self.prize_text().unwrap_or_default(),
                text(Key::PressBToContinue),
            ],
            Screen::Ended(EndPhase::ReplySelection) => vec![
                text(Key::YourReply),
                text(Key::HowToRespond),
                if self.copied {
                    text(Key::Ok)
                } else {
                    text(Key::CopyAndSend)
                },
            ],
            Screen::Ended(EndPhase::Success) => {
                let mut lines = vec![text(Key::MessageSent), named(Key::ResponseCopied, sender)];
                if let Some(i) = self.selected_reply {
                    let options = i18n::reply_options(locale, self.invite.category);
                    lines.push(format!("\"{}\"", options[i].text));
                }
                lines
            }
        }
    }
}

fn new_match(invite: &GameInvite, tuning: &Tuning, seed: u64) -> MatchState {
    let bubbles = i18n::bubble_messages(invite.locale, invite.category)
        .iter()
        .map(|s| s.to_string())
        .collect();
    MatchState::new(tuning.pong.clone(), bubbles, seed)
}

fn preview(message: &str) -> String {
    if message.chars().count() > MESSAGE_PREVIEW_CHARS {
        let head: String = message.chars().take(MESSAGE_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        message.to_string()
    }
}
