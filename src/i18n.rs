//! Localized strings
//!
//! The core only ever asks for opaque strings keyed by locale, category and
//! key. Templates use `{placeholder}` markers filled by [`fill`].

use crate::invite::{Category, Locale, PRIZE_COUNT};

/// Number of popup messages per category bank
pub const BUBBLE_COUNT: usize = 9;
/// Number of reply choices per category
pub const REPLY_COUNT: usize = 3;

/// Fixed UI strings used by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Sender-side clipboard text, `{name}` and `{link}`
    ShareText,
    InvalidLink,
    InvalidLinkMessage,
    CreateNewGame,
    Hey,
    SurpriseChallenge,
    PressToStart,
    Oops,
    SenderWonMessage,
    TryAgain,
    YouWon,
    HereIsWhatTheySaid,
    WouldYouLikeToReply,
    PressBToContinue,
    YourReply,
    HowToRespond,
    CopyAndSend,
    Ok,
    MessageSent,
    ResponseCopied,
    SpinTheWheel,
    WheelSubtitle,
    Spinning,
    CouponFrom,
    CouponAppend,
    /// Final reply clipboard text, `{reply}` and `{coupon}`
    ReplyShareMessage,
}

/// Look up a fixed UI string
pub fn t(key: Key, locale: Locale) -> &'static str {
    match locale {
        Locale::En => en(key),
        Locale::Zh => zh(key),
    }
}

fn en(key: Key) -> &'static str {
    match key {
        Key::ShareText => "Hey {name}! 👀✨ Someone has something to say to you... Open this to find out! {link}",
        Key::InvalidLink => "Invalid Link",
        Key::InvalidLinkMessage => "This game link seems to be broken.",
        Key::CreateNewGame => "Create New Game",
        Key::Hey => "HEY {name}!",
        Key::SurpriseChallenge => "{name} has prepared a surprise challenge for you.",
        Key::PressToStart => "▶ PRESS A TO START",
        Key::Oops => "Oops!",
        Key::SenderWonMessage => "{name} won somehow...",
        Key::TryAgain => "Try Again ►",
        Key::YouWon => "You Won!",
        Key::HereIsWhatTheySaid => "Here's what {name} wanted to say:",
        Key::WouldYouLikeToReply => "Would you like to send a reply?",
        Key::PressBToContinue => "Press Ⓑ to continue",
        Key::YourReply => "Your Reply",
        Key::HowToRespond => "How do you want to respond?",
        Key::CopyAndSend => "Copy & Send",
        Key::Ok => "OK!",
        Key::MessageSent => "Message Sent!",
        Key::ResponseCopied => "Your response has been copied. Now paste it in your chat with {name}!",
        Key::SpinTheWheel => "SPIN THE WHEEL",
        Key::WheelSubtitle => "Let's see how {name} makes it up!",
        Key::Spinning => "Spinning...",
        Key::CouponFrom => "{name} owes you:",
        Key::CouponAppend => "P.S. Don't forget you owe me: {prize}",
        Key::ReplyShareMessage => "{reply}\n\n{coupon}",
    }
}

fn zh(key: Key) -> &'static str {
    match key {
        Key::ShareText => "{name}！👀✨ 有人有话想对你说... 点开看看吧！{link}",
        Key::InvalidLink => "链接无效",
        Key::InvalidLinkMessage => "这个游戏链接似乎已损坏。",
        Key::CreateNewGame => "创建新游戏",
        Key::Hey => "嘿 {name}！",
        Key::SurpriseChallenge => "{name} 为你准备了一个惊喜挑战。",
        Key::PressToStart => "▶ 按 A 开始",
        Key::Oops => "哎呀！",
        Key::SenderWonMessage => "{name}居然赢了...",
        Key::TryAgain => "再试一次 ►",
        Key::YouWon => "你赢了！",
        Key::HereIsWhatTheySaid => "这是{name}想对你说的话：",
        Key::WouldYouLikeToReply => "你想回复吗？",
        Key::PressBToContinue => "按 Ⓑ 继续",
        Key::YourReply => "你的回复",
        Key::HowToRespond => "你想如何回应？",
        Key::CopyAndSend => "复制并发送",
        Key::Ok => "好的！",
        Key::MessageSent => "消息已发送！",
        Key::ResponseCopied => "你的回复已复制。现在去和{name}的聊天中粘贴吧！",
        Key::SpinTheWheel => "转转幸运轮",
        Key::WheelSubtitle => "看看{name}怎么补偿你！",
        Key::Spinning => "转动中...",
        Key::CouponFrom => "{name}欠你：",
        Key::CouponAppend => "附：别忘了你欠我：{prize}",
        Key::ReplyShareMessage => "{reply}\n\n{coupon}",
    }
}

/// Per-category heading shown above the sender's message, `{message}`
pub fn message_heading(locale: Locale, category: Category) -> &'static str {
    match (locale, category) {
        (Locale::En, Category::Apology) => "I am sorry for {message}",
        (Locale::En, Category::MissYou) => "I miss you because {message}",
        (Locale::En, Category::Love) => "I love you for {message}",
        (Locale::En, Category::ThankYou) => "Thank you for {message}",
        (Locale::Zh, Category::Apology) => "我想为{message}道歉",
        (Locale::Zh, Category::MissYou) => "我想你，因为{message}",
        (Locale::Zh, Category::Love) => "我爱你，因为{message}",
        (Locale::Zh, Category::ThankYou) => "谢谢你{message}",
    }
}

/// Popup messages the AI paddle says during a match
pub fn bubble_messages(locale: Locale, category: Category) -> [&'static str; BUBBLE_COUNT] {
    match (locale, category) {
        (Locale::En, Category::Apology) => [
            "OOPS!", "NICE ONE", "UR GOOD", "MY BAD", "HELP ME", "SORRY!", "YIKES", "TOO FAST",
            "OUCH!",
        ],
        (Locale::En, Category::MissYou) => [
            "MISS U!", "COME BACK", "NICE ONE", "CALL ME?", "SO FAR", "UR GOOD", "WAIT 4 ME",
            "TOO FAST", "THINK OF U",
        ],
        (Locale::En, Category::Love) => [
            "<3", "UR CUTE", "NICE ONE", "SWOON", "MY HEART", "XOXO", "UR GOOD", "BE MINE",
            "WOW",
        ],
        (Locale::En, Category::ThankYou) => [
            "THANKS!", "NICE ONE", "UR GOOD", "LEGEND", "MY HERO", "GRATEFUL", "TOO FAST",
            "BRAVO", "WOW!",
        ],
        (Locale::Zh, Category::Apology) => [
            "哎呀！", "厉害！", "你真棒", "我的错", "救命", "抱歉！", "糟糕", "太快了", "好痛！",
        ],
        (Locale::Zh, Category::MissYou) => [
            "想你了！", "快回来", "厉害！", "打给我？", "好远啊", "你真棒", "等等我", "太快了",
            "好想你",
        ],
        (Locale::Zh, Category::Love) => [
            "爱你", "好可爱", "厉害！", "心动了", "我的心", "么么哒", "你真棒", "做我的吧",
            "哇哦",
        ],
        (Locale::Zh, Category::ThankYou) => [
            "谢谢！", "厉害！", "你真棒", "太强了", "我的英雄", "感恩", "太快了", "好样的",
            "哇！",
        ],
    }
}

/// One reply choice on the reply-selection screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyOption {
    pub id: &'static str,
    /// Full text placed in the share message
    pub text: &'static str,
    /// Button label
    pub short: &'static str,
}

const fn reply(id: &'static str, text: &'static str, short: &'static str) -> ReplyOption {
    ReplyOption { id, text, short }
}

/// The three reply choices for a category
pub fn reply_options(locale: Locale, category: Category) -> [ReplyOption; REPLY_COUNT] {
    match (locale, category) {
        (Locale::En, Category::Apology) => [
            reply("ok", "I'm actually ok. Don't worry.", "ALL GOOD"),
            reply("talk", "Apology accepted. Let's talk.", "LET'S TALK"),
            reply("time", "Give me more time. I'll reach out.", "NEED TIME"),
        ],
        (Locale::En, Category::MissYou) => [
            reply("too", "I miss you too!", "ME TOO"),
            reply("call", "Let's call tonight.", "CALL ME"),
            reply("soon", "See you soon, I promise.", "SEE U SOON"),
        ],
        (Locale::En, Category::Love) => [
            reply("too", "I love you too.", "LOVE U TOO"),
            reply("date", "Let's go on a date this week.", "DATE?"),
            reply("blush", "You made me blush.", "BLUSHING"),
        ],
        (Locale::En, Category::ThankYou) => [
            reply("welcome", "You're welcome, anytime!", "ANYTIME"),
            reply("glad", "Glad I could help.", "GLAD TO"),
            reply("owe", "Now you owe me one!", "U OWE ME"),
        ],
        (Locale::Zh, Category::Apology) => [
            reply("ok", "我其实没事。别担心。", "没事啦"),
            reply("talk", "接受道歉。我们聊聊吧。", "聊聊吧"),
            reply("time", "给我一些时间。我会联系你的。", "需要时间"),
        ],
        (Locale::Zh, Category::MissYou) => [
            reply("too", "我也想你！", "我也是"),
            reply("call", "今晚打电话吧。", "打给我"),
            reply("soon", "很快见，我保证。", "很快见"),
        ],
        (Locale::Zh, Category::Love) => [
            reply("too", "我也爱你。", "我也爱你"),
            reply("date", "这周约会吧。", "约会？"),
            reply("blush", "你让我脸红了。", "脸红了"),
        ],
        (Locale::Zh, Category::ThankYou) => [
            reply("welcome", "不客气，随时找我！", "随时"),
            reply("glad", "很高兴能帮上忙。", "乐意"),
            reply("owe", "现在你欠我一次！", "你欠我"),
        ],
    }
}

/// Prizes shown on the wheel unless the sender customized them
pub fn default_prizes(locale: Locale) -> [&'static str; PRIZE_COUNT] {
    match locale {
        Locale::En => [
            "Make you a nice dinner",
            "Go to a game arcade",
            "Buy the keyboard you wanted",
            "Movie night, your pick",
            "Boba tea for a week",
            "A heartfelt letter",
        ],
        Locale::Zh => [
            "给你做一顿大餐",
            "一起去游戏厅",
            "买你想要的键盘",
            "电影之夜，你来选",
            "请你喝一周奶茶",
            "一封真心的信",
        ],
    }
}

/// Replace every `{placeholder}` with its value
///
/// Single pass over the template: substituted text is never rescanned, so
/// a name like `{link}` stays literal.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut text = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        text.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(placeholder, _)| *placeholder == key)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                text.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                text.push('{');
                rest = after;
            }
        }
    }
    text.push_str(rest);
    text
}

/// Clipboard text the sender pastes into a chat app
pub fn share_invite_text(locale: Locale, recipient: &str, link: &str) -> String {
    fill(t(Key::ShareText, locale), &[("name", recipient), ("link", link)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_all_occurrences() {
        let s = fill("{a} and {a} then {b}", &[("a", "x"), ("b", "y")]);
        assert_eq!(s, "x and x then y");
        // Unknown placeholders stay untouched
        assert_eq!(fill("{c}", &[("a", "x")]), "{c}");
    }

    #[test]
    fn test_every_bank_is_complete() {
        for locale in Locale::ALL {
            assert_eq!(default_prizes(locale).len(), PRIZE_COUNT);
            for category in Category::ALL {
                let bubbles = bubble_messages(locale, category);
                assert!(bubbles.iter().all(|b| !b.is_empty()));
                let replies = reply_options(locale, category);
                assert!(replies.iter().all(|r| !r.text.is_empty() && !r.short.is_empty()));
            }
        }
    }

    #[test]
    fn test_fill_does_not_rescan_values() {
        let s = share_invite_text(Locale::En, "{link}", "https://x/play?d=abc");
        assert!(s.starts_with("Hey {link}!"));
        assert_eq!(s.matches("https://x/play?d=abc").count(), 1);

        assert_eq!(fill("{a}{b}", &[("a", "{b}"), ("b", "y")]), "{b}y");
        assert_eq!(fill("{ {a} }", &[("a", "x")]), "{ x }");
        assert_eq!(fill("tail {a", &[("a", "x")]), "tail {a");
    }

    #[test]
    fn test_share_invite_text() {
        let s = share_invite_text(Locale::En, "Sam", "https://x.test/play?d=abc");
        assert!(s.starts_with("Hey Sam!"));
        assert!(s.ends_with("https://x.test/play?d=abc"));
    }
}
