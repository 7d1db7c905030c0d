use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Villager,
    Seer,
    Witch,
    Hunter,
    Cupid,
    Guardian,
    Werewolf,
    PiedPiper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Team {
    Villagers,
    Wolves,
    Independent,
}

/// Static metadata for one role. `priority` orders the night actions
/// (lower acts earlier); roles without a night action keep priority 0.
#[derive(Debug, Clone)]
pub struct RoleInfo {
    pub name: &'static str,
    pub emoji: &'static str,
    pub team: Team,
    pub description: &'static str,
    pub night_action: bool,
    pub priority: u8,
}

impl Role {
    pub fn info(&self) -> &'static RoleInfo {
        match self {
            Role::Villager => &RoleInfo {
                name: "Villager",
                emoji: "\u{1F468}\u{200D}\u{1F33E}",
                team: Team::Villagers,
                description: "An ordinary villager with no special powers. Use your intuition to find the wolves.",
                night_action: false,
                priority: 0,
            },
            Role::Seer => &RoleInfo {
                name: "Seer",
                emoji: "\u{1F52E}",
                team: Team::Villagers,
                description: "Each night you may learn the role of one player.",
                night_action: true,
                priority: 20,
            },
            Role::Witch => &RoleInfo {
                name: "Witch",
                emoji: "\u{1F9D9}\u{200D}\u{2640}\u{FE0F}",
                team: Team::Villagers,
                description: "You have two potions: one saves the wolves' victim, the other kills a player. Each works once.",
                night_action: true,
                priority: 30,
            },
            Role::Hunter => &RoleInfo {
                name: "Hunter",
                emoji: "\u{1F3F9}",
                team: Team::Villagers,
                description: "When you die, you take one other player with you.",
                night_action: false,
                priority: 0,
            },
            Role::Cupid => &RoleInfo {
                name: "Cupid",
                emoji: "\u{1F498}",
                team: Team::Villagers,
                description: "On the first night you bind two lovers. If one dies, so does the other.",
                night_action: true,
                priority: 1,
            },
            Role::Guardian => &RoleInfo {
                name: "Guardian",
                emoji: "\u{1F6E1}\u{FE0F}",
                team: Team::Villagers,
                description: "Each night you shield one player from the wolves. Never the same player twice in a row.",
                night_action: true,
                priority: 5,
            },
            Role::Werewolf => &RoleInfo {
                name: "Werewolf",
                emoji: "\u{1F43A}",
                team: Team::Wolves,
                description: "Each night you and the other wolves pick a victim together.",
                night_action: true,
                priority: 10,
            },
            Role::PiedPiper => &RoleInfo {
                name: "Pied Piper",
                emoji: "\u{1FA88}",
                team: Team::Independent,
                description: "Each night you enchant two players. You win once every other survivor is enchanted.",
                night_action: true,
                priority: 40,
            },
        }
    }

    pub fn team(&self) -> Team {
        self.info().team
    }

    /// Role card shown to the player, e.g. over a private message.
    pub fn card(&self) -> String {
        let info = self.info();
        format!("{} You are: {}\n\n{}", info.emoji, info.name, info.description)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info().name)
    }
}

/// Role multiset for a given player count. Empty below the 6-player
/// minimum; the caller shuffles and deals one role per seat in join order.
pub fn roles_for_players(num_players: usize) -> Vec<Role> {
    if num_players < 6 {
        return Vec::new();
    }

    let mut roles = Vec::with_capacity(num_players);

    // One wolf per 5 players, never fewer than one.
    let num_wolves = std::cmp::max(1, num_players / 5);
    roles.extend(std::iter::repeat(Role::Werewolf).take(num_wolves));

    roles.push(Role::Seer);

    if num_players >= 8 {
        roles.push(Role::Witch);
    }
    if num_players >= 9 {
        roles.push(Role::Hunter);
    }
    if num_players >= 10 {
        roles.push(Role::Guardian);
    }
    if num_players >= 12 {
        roles.push(Role::Cupid);
    }

    let num_villagers = num_players - roles.len();
    roles.extend(std::iter::repeat(Role::Villager).take(num_villagers));

    roles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(roles: &[Role], role: Role) -> usize {
        roles.iter().filter(|r| **r == role).count()
    }

    #[test]
    fn below_minimum_yields_no_roles() {
        for n in 0..6 {
            assert!(roles_for_players(n).is_empty(), "{} players should not start", n);
        }
    }

    #[test]
    fn output_size_matches_player_count() {
        for n in 6..=20 {
            assert_eq!(roles_for_players(n).len(), n, "{} players", n);
        }
    }

    #[test]
    fn wolf_count_scales_with_population() {
        for n in 6..=20 {
            let roles = roles_for_players(n);
            assert_eq!(
                count(&roles, Role::Werewolf),
                std::cmp::max(1, n / 5),
                "{} players",
                n
            );
        }
    }

    #[test]
    fn special_roles_unlock_at_thresholds() {
        for n in 6..=20 {
            let roles = roles_for_players(n);
            assert_eq!(count(&roles, Role::Seer), 1, "{} players", n);
            assert_eq!(count(&roles, Role::Witch), usize::from(n >= 8), "{} players", n);
            assert_eq!(count(&roles, Role::Hunter), usize::from(n >= 9), "{} players", n);
            assert_eq!(count(&roles, Role::Guardian), usize::from(n >= 10), "{} players", n);
            assert_eq!(count(&roles, Role::Cupid), usize::from(n >= 12), "{} players", n);
        }
    }

    #[test]
    fn remaining_seats_are_villagers() {
        let roles = roles_for_players(12);
        let specials = roles.iter().filter(|r| **r != Role::Villager).count();
        assert_eq!(count(&roles, Role::Villager), 12 - specials);
    }

    #[test]
    fn night_priorities_follow_the_catalog() {
        assert_eq!(Role::Cupid.info().priority, 1);
        assert_eq!(Role::Guardian.info().priority, 5);
        assert_eq!(Role::Werewolf.info().priority, 10);
        assert_eq!(Role::Seer.info().priority, 20);
        assert_eq!(Role::Witch.info().priority, 30);
        assert_eq!(Role::PiedPiper.info().priority, 40);
    }

    #[test]
    fn teams_are_fixed() {
        assert_eq!(Role::Werewolf.team(), Team::Wolves);
        assert_eq!(Role::PiedPiper.team(), Team::Independent);
        assert_eq!(Role::Seer.team(), Team::Villagers);
    }
}
