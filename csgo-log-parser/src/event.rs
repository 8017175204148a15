use chrono::{DateTime, Utc};
use serde::Serialize;

/// A player as identified in the log: display name, server slot id,
/// steam id (legacy `STEAM_1:1:...` or bracketed `[U:1:...]` form) and
/// team side. `side` is empty on lines written before team assignment
/// (connect, entered, banned, switched).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub name: String,
    pub id: i32,
    pub steam_id: String,
    pub side: String,
}

/// Map coordinates of an event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Map coordinates with sub-unit precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionFloat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Velocity of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// The two operands and result of a money change, `a + b = result`.
/// `b` is negative for deductions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Equation {
    pub a: i32,
    pub b: i32,
    pub result: i32,
}

/// One parsed log line: when it happened plus what happened.
///
/// Serializes as a single flat object, `time` first, then the `type` tag
/// and the event's own fields:
///
/// ```json
/// {"time":"2018-11-05T15:44:36Z","type":"PlayerPurchase","player":{...},"item":"m4a1"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub time: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl Message {
    pub fn new(time: DateTime<Utc>, event: Event) -> Message {
        Message { time, event }
    }

    /// The kind tag of the wrapped event, identical to the serialized
    /// `type` field.
    pub fn kind(&self) -> &'static str {
        self.event.kind()
    }
}

/// Everything a log line body can mean, one variant per known message
/// kind plus [`Event::Unknown`] for bodies no pattern covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Console event, e.g. `server_message: "quit"`.
    ServerMessage { text: String },
    /// Freeze period before each round. Keeps the log's own spelling.
    FreezTimeStart,
    /// Match start, carries the map about to be played.
    WorldMatchStart { map: String },
    WorldRoundStart,
    /// Server-initiated round restart with seconds until it happens.
    WorldRoundRestart { timeleft: i32 },
    WorldRoundEnd,
    WorldGameCommencing,
    /// End-of-round score for one team.
    TeamScored {
        side: String,
        score: i32,
        num_players: i32,
    },
    /// Round outcome notice (`SFUI_Notice_...`) with both scores.
    TeamNotice {
        side: String,
        notice: String,
        score_ct: i32,
        score_t: i32,
    },
    /// Player connected, before team assignment.
    PlayerConnected { player: Player, address: String },
    PlayerDisconnected { player: Player, reason: String },
    PlayerEntered { player: Player },
    PlayerBanned {
        player: Player,
        duration: String,
        by: String,
    },
    /// Player switched sides.
    PlayerSwitched {
        player: Player,
        from: String,
        to: String,
    },
    /// Chat message; `team` is true for `say_team`.
    PlayerSay {
        player: Player,
        text: String,
        team: bool,
    },
    PlayerPurchase { player: Player, item: String },
    /// Kill with positions of both players. The two flags come from the
    /// optional trailing parenthetical and are independent of each other.
    PlayerKill {
        attacker: Player,
        attacker_pos: Position,
        victim: Player,
        victim_pos: Position,
        weapon: String,
        headshot: bool,
        penetrated: bool,
    },
    PlayerKillAssist { attacker: Player, victim: Player },
    /// Damage dealt without a kill, with the victim's remaining stats.
    PlayerAttack {
        attacker: Player,
        attacker_pos: Position,
        victim: Player,
        victim_pos: Position,
        weapon: String,
        damage: i32,
        damage_armor: i32,
        health: i32,
        armor: i32,
        hitgroup: String,
    },
    PlayerKilledBomb { player: Player, pos: Position },
    PlayerKilledSuicide {
        player: Player,
        pos: Position,
        with: String,
    },
    PlayerPickedUp { player: Player, item: String },
    PlayerDropped { player: Player, item: String },
    /// Money change as a tracked equation; `purchase` is the bought item
    /// when the change came from a purchase, empty otherwise.
    PlayerMoneyChange {
        player: Player,
        equation: Equation,
        purchase: String,
    },
    PlayerBombGot { player: Player },
    PlayerBombPlanted { player: Player },
    PlayerBombDropped { player: Player },
    /// Defuse started; `kit` is false for the `Without_Kit` trigger.
    PlayerBombBeginDefuse { player: Player, kit: bool },
    PlayerBombDefused { player: Player },
    /// Grenade throw. `entindex` is only present for flashbangs and
    /// defaults to 0 otherwise.
    PlayerThrew {
        player: Player,
        pos: Position,
        entindex: i32,
        grenade: String,
    },
    /// Flash blindness with its duration in seconds.
    PlayerBlinded {
        attacker: Player,
        victim: Player,
        #[serde(rename = "for")]
        duration: f32,
        entindex: i32,
    },
    /// Molotov projectile spawn with exact position and velocity.
    ProjectileSpawned {
        pos: PositionFloat,
        velocity: Velocity,
    },
    /// Final score line; `duration` is the match length in minutes.
    GameOver {
        mode: String,
        map_group: String,
        map: String,
        score_ct: i32,
        score_t: i32,
        duration: i32,
    },
    /// A line with a valid timestamp whose body matched no pattern.
    /// Carries the body verbatim so nothing is lost.
    Unknown { raw: String },
}

impl Event {
    /// Stable kind tag, in 1:1 correspondence with the variant and with
    /// the serialized `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::ServerMessage { .. } => "ServerMessage",
            Event::FreezTimeStart => "FreezTimeStart",
            Event::WorldMatchStart { .. } => "WorldMatchStart",
            Event::WorldRoundStart => "WorldRoundStart",
            Event::WorldRoundRestart { .. } => "WorldRoundRestart",
            Event::WorldRoundEnd => "WorldRoundEnd",
            Event::WorldGameCommencing => "WorldGameCommencing",
            Event::TeamScored { .. } => "TeamScored",
            Event::TeamNotice { .. } => "TeamNotice",
            Event::PlayerConnected { .. } => "PlayerConnected",
            Event::PlayerDisconnected { .. } => "PlayerDisconnected",
            Event::PlayerEntered { .. } => "PlayerEntered",
            Event::PlayerBanned { .. } => "PlayerBanned",
            Event::PlayerSwitched { .. } => "PlayerSwitched",
            Event::PlayerSay { .. } => "PlayerSay",
            Event::PlayerPurchase { .. } => "PlayerPurchase",
            Event::PlayerKill { .. } => "PlayerKill",
            Event::PlayerKillAssist { .. } => "PlayerKillAssist",
            Event::PlayerAttack { .. } => "PlayerAttack",
            Event::PlayerKilledBomb { .. } => "PlayerKilledBomb",
            Event::PlayerKilledSuicide { .. } => "PlayerKilledSuicide",
            Event::PlayerPickedUp { .. } => "PlayerPickedUp",
            Event::PlayerDropped { .. } => "PlayerDropped",
            Event::PlayerMoneyChange { .. } => "PlayerMoneyChange",
            Event::PlayerBombGot { .. } => "PlayerBombGot",
            Event::PlayerBombPlanted { .. } => "PlayerBombPlanted",
            Event::PlayerBombDropped { .. } => "PlayerBombDropped",
            Event::PlayerBombBeginDefuse { .. } => "PlayerBombBeginDefuse",
            Event::PlayerBombDefused { .. } => "PlayerBombDefused",
            Event::PlayerThrew { .. } => "PlayerThrew",
            Event::PlayerBlinded { .. } => "PlayerBlinded",
            Event::ProjectileSpawned { .. } => "ProjectileSpawned",
            Event::GameOver { .. } => "GameOver",
            Event::Unknown { .. } => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 11, 5, 15, 44, 36).unwrap()
    }

    #[test]
    fn message_serializes_time_then_type_then_fields() {
        let message = Message::new(
            ts(),
            Event::PlayerPurchase {
                player: Player {
                    name: "Player-Name".to_string(),
                    id: 12,
                    steam_id: "[U:1:29384012]".to_string(),
                    side: "TERRORIST".to_string(),
                },
                item: "m4a1".to_string(),
            },
        );

        assert_eq!(
            concat!(
                r#"{"time":"2018-11-05T15:44:36Z","type":"PlayerPurchase","#,
                r#""player":{"name":"Player-Name","id":12,"steam_id":"[U:1:29384012]","side":"TERRORIST"},"#,
                r#""item":"m4a1"}"#
            ),
            serde_json::to_string(&message).unwrap()
        );
    }

    #[test]
    fn unit_variants_serialize_as_bare_tag() {
        let message = Message::new(ts(), Event::FreezTimeStart);

        assert_eq!(
            r#"{"time":"2018-11-05T15:44:36Z","type":"FreezTimeStart"}"#,
            serde_json::to_string(&message).unwrap()
        );
    }

    #[test]
    fn raw_log_text_is_not_html_escaped() {
        // Player names and chat text regularly carry <, > and &; they must
        // survive serialization verbatim.
        let message = Message::new(
            ts(),
            Event::Unknown {
                raw: r#""<baron> & <goose>" did FOO"#.to_string(),
            },
        );

        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""raw":"\"<baron> & <goose>\" did FOO""#));
    }

    #[test]
    fn blinded_duration_serializes_as_for() {
        let message = Message::new(
            ts(),
            Event::PlayerBlinded {
                attacker: Player {
                    name: "a".to_string(),
                    id: 1,
                    steam_id: "BOT".to_string(),
                    side: "CT".to_string(),
                },
                victim: Player {
                    name: "v".to_string(),
                    id: 2,
                    steam_id: "BOT".to_string(),
                    side: "TERRORIST".to_string(),
                },
                duration: 3.45,
                entindex: 163,
            },
        );

        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""for":3.45"#));
        assert!(json.contains(r#""entindex":163"#));
    }
}
