//! The pattern catalog: every known message body shape paired with the
//! builder that turns its captures into a typed [`Message`].
//!
//! Patterns use the permissive name and steam-id character classes (any
//! character for names, bracketed or colon-delimited steam ids), which
//! subsume the restrictive legacy dialect.
//!
//! Catalog entries must stay pairwise disjoint: no well-formed body may
//! match two of them. The dispatcher takes the first match, so
//! disjointness is what keeps results independent of catalog order. The
//! corpus test in this module checks it for one fixture body per kind.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::builders;
use crate::event::Message;

/// Builder function: turns the timestamp and the capture groups of one
/// matched pattern into a typed message. Group 0 is the whole match,
/// groups 1..n the parenthesized captures in source order.
pub type Builder = fn(DateTime<Utc>, &Captures<'_>) -> Message;

/// One catalog entry: a compiled body pattern bound to its builder.
pub struct Pattern {
    pub(crate) kind: &'static str,
    pub(crate) regex: Regex,
    pub(crate) build: Builder,
}

impl Pattern {
    /// Compiles `source` and binds it to `build`. `groups` is the number
    /// of capture groups the builder indexes into; a mismatch with the
    /// compiled pattern panics here, at construction, rather than
    /// misextracting at parse time. Panics on an invalid pattern.
    pub fn new(kind: &'static str, source: &str, groups: usize, build: Builder) -> Pattern {
        let regex = Regex::new(source).unwrap();
        assert_eq!(
            groups + 1,
            regex.captures_len(),
            "{}: pattern has {} capture groups, builder expects {}",
            kind,
            regex.captures_len() - 1,
            groups,
        );
        Pattern { kind, regex, build }
    }

    /// The kind tag of the messages this entry produces.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

pub const SERVER_MESSAGE_PATTERN: &str = r#"server_message: "(\w+)""#;
pub const FREEZ_TIME_START_PATTERN: &str = r"Starting Freeze period";
pub const WORLD_MATCH_START_PATTERN: &str = r#"World triggered "Match_Start" on "(\w+)""#;
pub const WORLD_ROUND_START_PATTERN: &str = r#"World triggered "Round_Start""#;
pub const WORLD_ROUND_RESTART_PATTERN: &str = r#"World triggered "Restart_Round_\((\d+)_second\)"#;
pub const WORLD_ROUND_END_PATTERN: &str = r#"World triggered "Round_End""#;
pub const WORLD_GAME_COMMENCING_PATTERN: &str = r#"World triggered "Game_Commencing""#;
pub const TEAM_SCORED_PATTERN: &str = r#"Team "(CT|TERRORIST)" scored "(\d+)" with "(\d+)" players"#;
pub const TEAM_NOTICE_PATTERN: &str =
    r#"Team "(CT|TERRORIST)" triggered "(\w+)" \(CT "(\d+)"\) \(T "(\d+)"\)"#;
pub const PLAYER_CONNECTED_PATTERN: &str =
    r#""(.+)<(\d+)><([\[\]\w:]+)><>" connected, address "(.*)""#;
pub const PLAYER_DISCONNECTED_PATTERN: &str =
    r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT|Unassigned|)>" disconnected \(reason "(.+)"\)"#;
pub const PLAYER_ENTERED_PATTERN: &str = r#""(.+)<(\d+)><([\[\]\w:]+)><>" entered the game"#;
pub const PLAYER_BANNED_PATTERN: &str =
    r#"Banid: "(.+)<(\d+)><([\[\]\w:]+)><\w*>" was banned "([\w. ]+)" by "(\w+)""#;
pub const PLAYER_SWITCHED_PATTERN: &str = r#""(.+)<(\d+)><([\[\]\w:]+)>" switched from team <(Unassigned|Spectator|TERRORIST|CT)> to <(Unassigned|Spectator|TERRORIST|CT)>"#;
pub const PLAYER_SAY_PATTERN: &str =
    r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" say(_team)? "(.*)""#;
pub const PLAYER_PURCHASE_PATTERN: &str =
    r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" purchased "(\w+)""#;
pub const PLAYER_KILL_PATTERN: &str = r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" \[(-?\d+) (-?\d+) (-?\d+)\] killed "(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" \[(-?\d+) (-?\d+) (-?\d+)\] with "(\w+)" ?(\(?(headshot|penetrated|headshot penetrated)?\))?"#;
pub const PLAYER_KILL_ASSIST_PATTERN: &str = r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" assisted killing "(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>""#;
pub const PLAYER_ATTACK_PATTERN: &str = r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" \[(-?\d+) (-?\d+) (-?\d+)\] attacked "(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" \[(-?\d+) (-?\d+) (-?\d+)\] with "(\w+)" \(damage "(\d+)"\) \(damage_armor "(\d+)"\) \(health "(\d+)"\) \(armor "(\d+)"\) \(hitgroup "([\w ]+)"\)"#;
pub const PLAYER_KILLED_BOMB_PATTERN: &str = r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" \[(-?\d+) (-?\d+) (-?\d+)\] was killed by the bomb\."#;
pub const PLAYER_KILLED_SUICIDE_PATTERN: &str = r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" \[(-?\d+) (-?\d+) (-?\d+)\] committed suicide with "(.*)""#;
pub const PLAYER_PICKED_UP_PATTERN: &str =
    r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" picked up "(\w+)""#;
pub const PLAYER_DROPPED_PATTERN: &str =
    r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT|Unassigned)>" dropped "(\w+)""#;
pub const PLAYER_MONEY_CHANGE_PATTERN: &str = r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" money change (\d+)\+?(-?\d+) = \$(\d+) \(tracked\)( \(purchase: (\w+)\))?"#;
pub const PLAYER_BOMB_GOT_PATTERN: &str =
    r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" triggered "Got_The_Bomb""#;
pub const PLAYER_BOMB_PLANTED_PATTERN: &str =
    r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" triggered "Planted_The_Bomb""#;
pub const PLAYER_BOMB_DROPPED_PATTERN: &str =
    r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" triggered "Dropped_The_Bomb""#;
pub const PLAYER_BOMB_BEGIN_DEFUSE_PATTERN: &str =
    r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" triggered "Begin_Bomb_Defuse_With(out)?_Kit""#;
pub const PLAYER_BOMB_DEFUSED_PATTERN: &str =
    r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" triggered "Defused_The_Bomb""#;
pub const PLAYER_THREW_PATTERN: &str = r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" threw (\w+) \[(-?\d+) (-?\d+) (-?\d+)\]( flashbang entindex (\d+))?\)?"#;
pub const PLAYER_BLINDED_PATTERN: &str = r#""(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" blinded for ([\d.]+) by "(.+)<(\d+)><([\[\]\w:]+)><(TERRORIST|CT)>" from flashbang entindex (\d+)"#;
pub const PROJECTILE_SPAWNED_PATTERN: &str = r"Molotov projectile spawned at (-?\d+\.\d+) (-?\d+\.\d+) (-?\d+\.\d+), velocity (-?\d+\.\d+) (-?\d+\.\d+) (-?\d+\.\d+)";
pub const GAME_OVER_PATTERN: &str = r"Game Over: (\w+) (\w+) (\w+) score (\d+):(\d+) after (\d+) min";

lazy_static! {
    /// The default catalog, one entry per known event kind. Built once;
    /// only read afterwards, so it is safe to share across threads.
    pub static ref CATALOG: Vec<Pattern> = vec![
        Pattern::new("ServerMessage", SERVER_MESSAGE_PATTERN, 1, builders::server_message),
        Pattern::new("FreezTimeStart", FREEZ_TIME_START_PATTERN, 0, builders::freez_time_start),
        Pattern::new("WorldMatchStart", WORLD_MATCH_START_PATTERN, 1, builders::world_match_start),
        Pattern::new("WorldRoundStart", WORLD_ROUND_START_PATTERN, 0, builders::world_round_start),
        Pattern::new("WorldRoundRestart", WORLD_ROUND_RESTART_PATTERN, 1, builders::world_round_restart),
        Pattern::new("WorldRoundEnd", WORLD_ROUND_END_PATTERN, 0, builders::world_round_end),
        Pattern::new("WorldGameCommencing", WORLD_GAME_COMMENCING_PATTERN, 0, builders::world_game_commencing),
        Pattern::new("TeamScored", TEAM_SCORED_PATTERN, 3, builders::team_scored),
        Pattern::new("TeamNotice", TEAM_NOTICE_PATTERN, 4, builders::team_notice),
        Pattern::new("PlayerConnected", PLAYER_CONNECTED_PATTERN, 4, builders::player_connected),
        Pattern::new("PlayerDisconnected", PLAYER_DISCONNECTED_PATTERN, 5, builders::player_disconnected),
        Pattern::new("PlayerEntered", PLAYER_ENTERED_PATTERN, 3, builders::player_entered),
        Pattern::new("PlayerBanned", PLAYER_BANNED_PATTERN, 5, builders::player_banned),
        Pattern::new("PlayerSwitched", PLAYER_SWITCHED_PATTERN, 5, builders::player_switched),
        Pattern::new("PlayerSay", PLAYER_SAY_PATTERN, 6, builders::player_say),
        Pattern::new("PlayerPurchase", PLAYER_PURCHASE_PATTERN, 5, builders::player_purchase),
        Pattern::new("PlayerKill", PLAYER_KILL_PATTERN, 17, builders::player_kill),
        Pattern::new("PlayerKillAssist", PLAYER_KILL_ASSIST_PATTERN, 8, builders::player_kill_assist),
        Pattern::new("PlayerAttack", PLAYER_ATTACK_PATTERN, 20, builders::player_attack),
        Pattern::new("PlayerKilledBomb", PLAYER_KILLED_BOMB_PATTERN, 7, builders::player_killed_bomb),
        Pattern::new("PlayerKilledSuicide", PLAYER_KILLED_SUICIDE_PATTERN, 8, builders::player_killed_suicide),
        Pattern::new("PlayerPickedUp", PLAYER_PICKED_UP_PATTERN, 5, builders::player_picked_up),
        Pattern::new("PlayerDropped", PLAYER_DROPPED_PATTERN, 5, builders::player_dropped),
        Pattern::new("PlayerMoneyChange", PLAYER_MONEY_CHANGE_PATTERN, 9, builders::player_money_change),
        Pattern::new("PlayerBombGot", PLAYER_BOMB_GOT_PATTERN, 4, builders::player_bomb_got),
        Pattern::new("PlayerBombPlanted", PLAYER_BOMB_PLANTED_PATTERN, 4, builders::player_bomb_planted),
        Pattern::new("PlayerBombDropped", PLAYER_BOMB_DROPPED_PATTERN, 4, builders::player_bomb_dropped),
        Pattern::new("PlayerBombBeginDefuse", PLAYER_BOMB_BEGIN_DEFUSE_PATTERN, 5, builders::player_bomb_begin_defuse),
        Pattern::new("PlayerBombDefused", PLAYER_BOMB_DEFUSED_PATTERN, 4, builders::player_bomb_defused),
        Pattern::new("PlayerThrew", PLAYER_THREW_PATTERN, 10, builders::player_threw),
        Pattern::new("PlayerBlinded", PLAYER_BLINDED_PATTERN, 10, builders::player_blinded),
        Pattern::new("ProjectileSpawned", PROJECTILE_SPAWNED_PATTERN, 6, builders::projectile_spawned),
        Pattern::new("GameOver", GAME_OVER_PATTERN, 6, builders::game_over),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    // One well-formed body per catalog entry, taken from real server logs.
    fn corpus() -> Vec<(&'static str, &'static str)> {
        vec![
            ("ServerMessage", r#"server_message: "quit""#),
            ("FreezTimeStart", "Starting Freeze period"),
            ("WorldMatchStart", r#"World triggered "Match_Start" on "de_cache""#),
            ("WorldRoundStart", r#"World triggered "Round_Start""#),
            ("WorldRoundRestart", r#"World triggered "Restart_Round_(1_second)"#),
            ("WorldRoundEnd", r#"World triggered "Round_End""#),
            ("WorldGameCommencing", r#"World triggered "Game_Commencing""#),
            ("TeamScored", r#"Team "CT" scored "1" with "5" players"#),
            ("TeamNotice", r#"Team "CT" triggered "SFUI_Notice_CTs_Win" (CT "1") (T "0")"#),
            ("PlayerConnected", r#""Player-Name<12><[U:1:29384012]><>" connected, address "foo""#),
            ("PlayerDisconnected", r#""Player-Name<12><[U:1:29384012]><TERRORIST>" disconnected (reason "Kicked by Console : For killing a teammate at round start")"#),
            ("PlayerEntered", r#""Player-Name<12><[U:1:29384012]><>" entered the game"#),
            ("PlayerBanned", r#"Banid: "Player-Name<12><[U:1:29384012]><>" was banned "for 15.00 minutes" by "Console""#),
            ("PlayerSwitched", r#""Player-Name<12><[U:1:29384012]>" switched from team <TERRORIST> to <Spectator>"#),
            ("PlayerSay", r#""Player-Name<12><[U:1:29384012]><TERRORIST>" say_team ".ready""#),
            ("PlayerPurchase", r#""Player-Name<12><[U:1:29384012]><TERRORIST>" purchased "m4a1""#),
            ("PlayerKill", r#""Player-Name<12><[U:1:29384012]><TERRORIST>" [-225 -1829 -168] killed "Zim<20><BOT><CT>" [-476 -1709 -110] with "glock" (headshot penetrated)"#),
            ("PlayerKillAssist", r#""Player-Name<10><STEAM_1:1:0101010><CT>" assisted killing "Player-Name<12><[U:1:29384012]><TERRORIST>""#),
            ("PlayerAttack", r#""Player-Name<2><[U:1:29384012]><TERRORIST>" [480 -67 1782] attacked "Jon<9><BOT><CT>" [-134 362 1613] with "ak47" (damage "27") (damage_armor "3") (health "73") (armor "96") (hitgroup "chest")"#),
            ("PlayerKilledBomb", r#""Player-Name<2><[U:1:29384012]><TERRORIST>" [480 -67 1782] was killed by the bomb."#),
            ("PlayerKilledSuicide", r#""Player-Name<2><[U:1:29384012]><TERRORIST>" [480 -67 1782] committed suicide with "hegrenade""#),
            ("PlayerPickedUp", r#""Player-Name<2><[U:1:29384012]><TERRORIST>" picked up "ump45""#),
            ("PlayerDropped", r#""Player-Name<2><[U:1:29384012]><TERRORIST>" dropped "knife""#),
            ("PlayerMoneyChange", r#""Player-Name<2><[U:1:29384012]><TERRORIST>" money change 2050-1000 = $1050 (tracked) (purchase: item_assaultsuit)"#),
            ("PlayerBombGot", r#""Player-Name<2><[U:1:29384012]><TERRORIST>" triggered "Got_The_Bomb""#),
            ("PlayerBombPlanted", r#""Player-Name<2><[U:1:29384012]><TERRORIST>" triggered "Planted_The_Bomb""#),
            ("PlayerBombDropped", r#""Player-Name<2><[U:1:29384012]><TERRORIST>" triggered "Dropped_The_Bomb""#),
            ("PlayerBombBeginDefuse", r#""Player-Name<2><[U:1:29384012]><CT>" triggered "Begin_Bomb_Defuse_Without_Kit""#),
            ("PlayerBombDefused", r#""Player-Name<2><[U:1:29384012]><CT>" triggered "Defused_The_Bomb""#),
            ("PlayerThrew", r#""Player-Name<12><[U:1:29384012]><TERRORIST>" threw smokegrenade [-716 -1636 -170]"#),
            ("PlayerBlinded", r#""Player-Name<12><[U:1:29384012]><TERRORIST>" blinded for 3.45 by "Player-Name<10><STEAM_1:1:0101010><CT>" from flashbang entindex 163"#),
            ("ProjectileSpawned", "Molotov projectile spawned at -539.715820 -2332.986572 -100.142113, velocity -77.150497 824.855957 175.574585"),
            ("GameOver", "Game Over: competitive mg_de_cache de_cache score 16:1 after 21 min"),
        ]
    }

    #[test]
    fn catalog_covers_every_corpus_kind_once() {
        assert_eq!(corpus().len(), CATALOG.len());
        for (kind, _) in corpus() {
            assert_eq!(
                1,
                CATALOG.iter().filter(|p| p.kind == kind).count(),
                "kind {} should appear exactly once in the catalog",
                kind
            );
        }
    }

    #[test]
    fn corpus_bodies_match_exactly_one_pattern() {
        // Disjointness invariant: first-match-wins dispatch is only sound
        // when no body can match two catalog entries.
        for (kind, body) in corpus() {
            let hits: Vec<&str> = CATALOG
                .iter()
                .filter(|p| p.regex.is_match(body))
                .map(|p| p.kind)
                .collect();
            assert_eq!(vec![kind], hits, "body: {}", body);
        }
    }

    #[test]
    fn corpus_kinds_agree_with_serialized_tag() {
        for (kind, body) in corpus() {
            let line = format!("L 11/05/2018 - 15:44:36: {}", body);
            let message = crate::parse(&line).unwrap();
            assert_eq!(kind, message.kind());

            let json: serde_json::Value =
                serde_json::from_str(&crate::to_json(&message).unwrap()).unwrap();
            assert_eq!(kind, json["type"], "kind tag mismatch for {}", kind);
        }
    }

    #[test]
    fn group_counts_are_validated_at_construction() {
        // Pattern::new asserts the declared group count against the
        // compiled pattern; forcing the static is enough to run it for
        // the whole catalog.
        assert_eq!(33, CATALOG.len());
    }
}
