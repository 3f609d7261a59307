//! Sorry Pong entry point
//!
//! On the web this only installs logging; the page creates a `PlaySession`.
//! Natively it decodes an invite link or token and lets a bot play it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Sorry Pong starting...");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sorry Pong (native) starting...");

    let Some(link) = std::env::args().nth(1) else {
        eprintln!("usage: sorry-pong <play link | token>");
        std::process::exit(2);
    };

    let code = headless::run(&link);
    std::process::exit(code);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use sorry_pong::flow::{EndPhase, PlayFlow, Screen};
    use sorry_pong::platform::LogClipboard;
    use sorry_pong::{GameInvite, Tuning, codec};

    /// One display frame at 60 Hz
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up on a match that runs longer than this
    const MAX_MATCH_FRAMES: u32 = 200_000;
    /// Frames the wheel accelerates before the bot presses stop
    const SPIN_FRAMES: u32 = 90;
    /// The bot leaves its paddle alone this close to the ball
    const TRACK_DEAD_ZONE: f32 = 8.0;

    fn parse(link: &str) -> Option<GameInvite> {
        if link.contains('?') {
            codec::invite_from_url(link)
        } else {
            codec::decode(link)
        }
    }

    fn print_screen(flow: &PlayFlow<LogClipboard>) {
        for line in flow.lines() {
            println!("{line}");
        }
        println!();
    }

    /// Play the link to the end, returning the process exit code
    pub fn run(link: &str) -> i32 {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let mut flow = PlayFlow::new(parse(link), Tuning::load(), LogClipboard, seed);
        print_screen(&flow);
        if flow.screen() == Screen::InvalidLink {
            return 1;
        }

        let mut now = 0.0;
        let mut frame = |flow: &mut PlayFlow<LogClipboard>| {
            now += FRAME_MS;
            flow.frame(now);
        };

        flow.trigger_primary();
        let mut frames = 0;
        while flow.screen() == Screen::Playing && frames < MAX_MATCH_FRAMES {
            steer(&mut flow);
            frame(&mut flow);
            frames += 1;
        }
        log::info!(
            "Bot match finished after {} frames: {} - {}",
            frames,
            flow.game().recipient_score,
            flow.game().sender_score
        );
        print_screen(&flow);

        if flow.screen() != Screen::Ended(EndPhase::ApologyReveal) {
            return 0;
        }

        flow.advance_phase();
        if flow.screen() == Screen::Ended(EndPhase::Wheel) {
            flow.trigger_primary();
            for _ in 0..SPIN_FRAMES {
                frame(&mut flow);
            }
            flow.advance_phase();
            while flow.screen() == Screen::Ended(EndPhase::Wheel) {
                frame(&mut flow);
            }
            print_screen(&flow);
            flow.advance_phase();
        }

        flow.select_reply(0);
        flow.trigger_primary();
        while flow.screen() == Screen::Ended(EndPhase::ReplySelection) && !flow.copy_failed() {
            frame(&mut flow);
        }
        print_screen(&flow);
        0
    }

    /// Follow the ball with the player paddle
    fn steer(flow: &mut PlayFlow<LogClipboard>) {
        let game = flow.game();
        let offset = game.ball.pos.y - game.player.center(game.tuning.paddle_height);
        if offset < -TRACK_DEAD_ZONE {
            flow.move_player_up();
        } else if offset > TRACK_DEAD_ZONE {
            flow.move_player_down();
        } else {
            flow.stop_player_move();
        }
    }
}
