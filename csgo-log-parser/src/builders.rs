//! Builder functions, one per catalog pattern.
//!
//! Every builder indexes positionally into the capture groups of the
//! pattern it is registered with in the catalog. Pattern and builder are
//! a coupled pair: changing the group layout of one means changing the
//! other. The group count recorded in the catalog entry is checked
//! against the compiled pattern when the catalog is built.

use chrono::{DateTime, Utc};
use regex::Captures;

use crate::event::{
    Equation, Event, Message, Player, Position, PositionFloat, Velocity,
};

/// Capture group by index, empty when the group did not participate in
/// the match (optional groups).
fn group<'t>(caps: &Captures<'t>, i: usize) -> &'t str {
    caps.get(i).map_or("", |m| m.as_str())
}

fn text(caps: &Captures, i: usize) -> String {
    group(caps, i).to_string()
}

/// Base-10 signed integer, 0 when the text is not a valid integer. The
/// patterns only capture digits here, so a failure means the pattern and
/// the log disagree; it must not take the whole batch down.
pub(crate) fn to_int(v: &str) -> i32 {
    v.parse().unwrap_or(0)
}

/// 32-bit float, 0.0 when the text is not a valid float.
pub(crate) fn to_float(v: &str) -> f32 {
    v.parse().unwrap_or(0.0)
}

/// Player identity from four adjacent groups starting at `i`: name, id,
/// steam id, side.
fn player(caps: &Captures, i: usize) -> Player {
    Player {
        name: text(caps, i),
        id: to_int(group(caps, i + 1)),
        steam_id: text(caps, i + 2),
        side: text(caps, i + 3),
    }
}

/// Player identity from three adjacent groups, for lines written before
/// or outside team assignment. `side` stays empty.
fn player_no_side(caps: &Captures, i: usize) -> Player {
    Player {
        name: text(caps, i),
        id: to_int(group(caps, i + 1)),
        steam_id: text(caps, i + 2),
        side: String::new(),
    }
}

/// Integer coordinate triple from three adjacent groups starting at `i`.
fn position(caps: &Captures, i: usize) -> Position {
    Position {
        x: to_int(group(caps, i)),
        y: to_int(group(caps, i + 1)),
        z: to_int(group(caps, i + 2)),
    }
}

fn position_float(caps: &Captures, i: usize) -> PositionFloat {
    PositionFloat {
        x: to_float(group(caps, i)),
        y: to_float(group(caps, i + 1)),
        z: to_float(group(caps, i + 2)),
    }
}

fn velocity(caps: &Captures, i: usize) -> Velocity {
    Velocity {
        x: to_float(group(caps, i)),
        y: to_float(group(caps, i + 1)),
        z: to_float(group(caps, i + 2)),
    }
}

pub(crate) fn server_message(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::ServerMessage {
            text: text(caps, 1),
        },
    )
}

pub(crate) fn freez_time_start(time: DateTime<Utc>, _caps: &Captures) -> Message {
    Message::new(time, Event::FreezTimeStart)
}

pub(crate) fn world_match_start(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(time, Event::WorldMatchStart { map: text(caps, 1) })
}

pub(crate) fn world_round_start(time: DateTime<Utc>, _caps: &Captures) -> Message {
    Message::new(time, Event::WorldRoundStart)
}

pub(crate) fn world_round_restart(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::WorldRoundRestart {
            timeleft: to_int(group(caps, 1)),
        },
    )
}

pub(crate) fn world_round_end(time: DateTime<Utc>, _caps: &Captures) -> Message {
    Message::new(time, Event::WorldRoundEnd)
}

pub(crate) fn world_game_commencing(time: DateTime<Utc>, _caps: &Captures) -> Message {
    Message::new(time, Event::WorldGameCommencing)
}

pub(crate) fn team_scored(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::TeamScored {
            side: text(caps, 1),
            score: to_int(group(caps, 2)),
            num_players: to_int(group(caps, 3)),
        },
    )
}

pub(crate) fn team_notice(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::TeamNotice {
            side: text(caps, 1),
            notice: text(caps, 2),
            score_ct: to_int(group(caps, 3)),
            score_t: to_int(group(caps, 4)),
        },
    )
}

pub(crate) fn player_connected(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerConnected {
            player: player_no_side(caps, 1),
            address: text(caps, 4),
        },
    )
}

pub(crate) fn player_disconnected(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerDisconnected {
            player: player(caps, 1),
            reason: text(caps, 5),
        },
    )
}

pub(crate) fn player_entered(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerEntered {
            player: player_no_side(caps, 1),
        },
    )
}

pub(crate) fn player_banned(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerBanned {
            player: player_no_side(caps, 1),
            duration: text(caps, 4),
            by: text(caps, 5),
        },
    )
}

pub(crate) fn player_switched(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerSwitched {
            player: player_no_side(caps, 1),
            from: text(caps, 4),
            to: text(caps, 5),
        },
    )
}

pub(crate) fn player_say(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerSay {
            player: player(caps, 1),
            team: group(caps, 5) == "_team",
            text: text(caps, 6),
        },
    )
}

pub(crate) fn player_purchase(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerPurchase {
            player: player(caps, 1),
            item: text(caps, 5),
        },
    )
}

pub(crate) fn player_kill(time: DateTime<Utc>, caps: &Captures) -> Message {
    // Group 17 is the content of the optional trailing parenthetical;
    // both flags may appear in it at once.
    Message::new(
        time,
        Event::PlayerKill {
            attacker: player(caps, 1),
            attacker_pos: position(caps, 5),
            victim: player(caps, 8),
            victim_pos: position(caps, 12),
            weapon: text(caps, 15),
            headshot: group(caps, 17).contains("headshot"),
            penetrated: group(caps, 17).contains("penetrated"),
        },
    )
}

pub(crate) fn player_kill_assist(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerKillAssist {
            attacker: player(caps, 1),
            victim: player(caps, 5),
        },
    )
}

pub(crate) fn player_attack(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerAttack {
            attacker: player(caps, 1),
            attacker_pos: position(caps, 5),
            victim: player(caps, 8),
            victim_pos: position(caps, 12),
            weapon: text(caps, 15),
            damage: to_int(group(caps, 16)),
            damage_armor: to_int(group(caps, 17)),
            health: to_int(group(caps, 18)),
            armor: to_int(group(caps, 19)),
            hitgroup: text(caps, 20),
        },
    )
}

pub(crate) fn player_killed_bomb(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerKilledBomb {
            player: player(caps, 1),
            pos: position(caps, 5),
        },
    )
}

pub(crate) fn player_killed_suicide(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerKilledSuicide {
            player: player(caps, 1),
            pos: position(caps, 5),
            with: text(caps, 8),
        },
    )
}

pub(crate) fn player_picked_up(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerPickedUp {
            player: player(caps, 1),
            item: text(caps, 5),
        },
    )
}

pub(crate) fn player_dropped(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerDropped {
            player: player(caps, 1),
            item: text(caps, 5),
        },
    )
}

pub(crate) fn player_money_change(time: DateTime<Utc>, caps: &Captures) -> Message {
    // The sign of b is only textual for deductions; additions leave the
    // `+` outside the group, so a plain parse of group 6 keeps the sign.
    Message::new(
        time,
        Event::PlayerMoneyChange {
            player: player(caps, 1),
            equation: Equation {
                a: to_int(group(caps, 5)),
                b: to_int(group(caps, 6)),
                result: to_int(group(caps, 7)),
            },
            purchase: text(caps, 9),
        },
    )
}

pub(crate) fn player_bomb_got(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerBombGot {
            player: player(caps, 1),
        },
    )
}

pub(crate) fn player_bomb_planted(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerBombPlanted {
            player: player(caps, 1),
        },
    )
}

pub(crate) fn player_bomb_dropped(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerBombDropped {
            player: player(caps, 1),
        },
    )
}

pub(crate) fn player_bomb_begin_defuse(time: DateTime<Utc>, caps: &Captures) -> Message {
    // Group 5 captures the "out" of "Without"; having a kit is its absence.
    Message::new(
        time,
        Event::PlayerBombBeginDefuse {
            player: player(caps, 1),
            kit: group(caps, 5) != "out",
        },
    )
}

pub(crate) fn player_bomb_defused(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerBombDefused {
            player: player(caps, 1),
        },
    )
}

pub(crate) fn player_threw(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerThrew {
            player: player(caps, 1),
            grenade: text(caps, 5),
            pos: position(caps, 6),
            entindex: to_int(group(caps, 10)),
        },
    )
}

pub(crate) fn player_blinded(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::PlayerBlinded {
            victim: player(caps, 1),
            duration: to_float(group(caps, 5)),
            attacker: player(caps, 6),
            entindex: to_int(group(caps, 10)),
        },
    )
}

pub(crate) fn projectile_spawned(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::ProjectileSpawned {
            pos: position_float(caps, 1),
            velocity: velocity(caps, 4),
        },
    )
}

pub(crate) fn game_over(time: DateTime<Utc>, caps: &Captures) -> Message {
    Message::new(
        time,
        Event::GameOver {
            mode: text(caps, 1),
            map_group: text(caps, 2),
            map: text(caps, 3),
            score_ct: to_int(group(caps, 4)),
            score_t: to_int(group(caps, 5)),
            duration: to_int(group(caps, 6)),
        },
    )
}
