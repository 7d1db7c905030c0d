use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::GameError;

use super::player::Player;
use super::role::{roles_for_players, Role};

pub const MIN_PLAYERS: usize = 6;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    Lobby,
    Night,
    DayDiscussion,
    DayVoting,
    Finished,
}

/// Conceptual ordering of the night. Informational only: no action is
/// gated on it, completion is tracked per player and on `wolf_target`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum NightPhase {
    Cupid,
    Guardian,
    Wolves,
    Seer,
    Witch,
    Piper,
    Done,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    VillagersWin,
    WolvesWin,
    PiperWin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NightAction {
    CupidLink { first_target: u64, second_target: u64 },
    Protect { target_id: u64 },
    WolfVote { target_id: u64 },
    Inspect { target_id: u64 },
    WitchAct { heal: bool, kill_target: Option<u64> },
    Enchant { first_target: u64, second_target: u64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightActionRequest {
    pub player_id: u64,
    pub action: NightAction,
}

/// One werewolf match, scoped to a single chat room. All methods are
/// synchronous state transitions; the owning layer serializes access.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WerewolfGame {
    pub chat_id: String,
    pub creator_id: u64,
    pub phase: GamePhase,
    pub night_phase: NightPhase,
    pub result: GameResult,
    /// Join order; roles are dealt in this order at start.
    pub players: Vec<Player>,
    pub day_number: u32,
    pub min_players: usize,
    pub wolf_target: Option<u64>,
    pub protected_player: Option<u64>,
    /// Carried across nights to enforce the guardian's anti-repeat rule.
    pub last_protected: Option<u64>,
    pub witch_heal_used: bool,
    pub witch_kill_used: bool,
    pub witch_heal_target: Option<u64>,
    pub witch_kill_target: Option<u64>,
    pub night_deaths: Vec<u64>,
    /// Set when a lynched Hunter still owes the village a shot; the
    /// night/day cycle does not resume until it is spent.
    pub pending_hunter: Option<u64>,
}

impl WerewolfGame {
    pub fn new(chat_id: String, creator_id: u64) -> Self {
        WerewolfGame {
            chat_id,
            creator_id,
            phase: GamePhase::Lobby,
            night_phase: NightPhase::Cupid,
            result: GameResult::InProgress,
            players: Vec::new(),
            day_number: 0,
            min_players: MIN_PLAYERS,
            wolf_target: None,
            protected_player: None,
            last_protected: None,
            witch_heal_used: false,
            witch_kill_used: false,
            witch_heal_target: None,
            witch_kill_target: None,
            night_deaths: Vec::new(),
            pending_hunter: None,
        }
    }

    // --- lobby ---

    pub fn add_player(
        &mut self,
        user_id: u64,
        name: String,
        username: Option<String>,
    ) -> Result<String, GameError> {
        if self.phase != GamePhase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        if self.player(user_id).is_some() {
            return Err(GameError::AlreadyJoined);
        }
        self.players.push(Player::new(user_id, name.clone(), username));
        Ok(format!("{} joined! ({} players)", name, self.players.len()))
    }

    pub fn remove_player(&mut self, user_id: u64) -> Result<String, GameError> {
        if self.phase != GamePhase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.user_id == user_id)
            .ok_or(GameError::NotInGame)?;
        let name = self.players.remove(idx).name;
        Ok(format!("{} left. ({} players)", name, self.players.len()))
    }

    pub fn start(&mut self, user_id: u64) -> Result<String, GameError> {
        if self.phase != GamePhase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        if user_id != self.creator_id {
            return Err(GameError::NotCreator);
        }
        if self.players.len() < self.min_players {
            return Err(GameError::NotEnoughPlayers(self.min_players));
        }

        let mut roles = roles_for_players(self.players.len());
        roles.shuffle(&mut rand::thread_rng());
        for (player, role) in self.players.iter_mut().zip(roles) {
            player.role = Some(role);
        }

        self.phase = GamePhase::Night;
        self.day_number = 1;
        self.reset_night();

        Ok(self.night_start_message())
    }

    /// Role card for one player; remembers that it was shown.
    pub fn player_role(&mut self, user_id: u64) -> Result<String, GameError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.user_id == user_id)
            .ok_or(GameError::NotInGame)?;
        let role = self.players[idx].role.ok_or(GameError::WrongPhase)?;
        self.players[idx].has_seen_role = true;
        Ok(role.card())
    }

    // --- roster helpers ---

    pub fn player(&self, user_id: u64) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    fn living(&self, user_id: u64) -> bool {
        self.player(user_id).map_or(false, |p| p.is_alive)
    }

    fn name_of(&self, user_id: u64) -> String {
        self.player(user_id)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }

    pub fn alive_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_alive).collect()
    }

    pub fn alive_wolves(&self) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.is_alive && p.is_wolf())
            .collect()
    }

    /// Validates that `user_id` may act tonight as `role` and has not
    /// acted yet; returns the roster index.
    fn night_actor(&self, user_id: u64, role: Role) -> Result<usize, GameError> {
        if self.phase != GamePhase::Night {
            return Err(GameError::WrongPhase);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.user_id == user_id)
            .ok_or(GameError::NotInGame)?;
        if self.players[idx].role != Some(role) {
            return Err(GameError::WrongRole(role.info().name));
        }
        if !self.players[idx].is_alive {
            return Err(GameError::Dead);
        }
        if self.players[idx].night_action_done {
            return Err(GameError::AlreadyActed);
        }
        Ok(idx)
    }

    // --- night actions ---

    pub fn cupid_link(
        &mut self,
        cupid_id: u64,
        first: u64,
        second: u64,
    ) -> Result<String, GameError> {
        if self.phase == GamePhase::Night && self.day_number != 1 {
            return Err(GameError::CupidExpired);
        }
        let idx = self.night_actor(cupid_id, Role::Cupid)?;
        if first == second || !self.living(first) || !self.living(second) {
            return Err(GameError::InvalidTarget);
        }

        for (a, b) in [(first, second), (second, first)] {
            if let Some(p) = self.players.iter_mut().find(|p| p.user_id == a) {
                p.is_in_love = true;
                p.lover_id = Some(b);
            }
        }
        self.players[idx].night_action_done = true;

        Ok(format!(
            "You have matched {} and {}!",
            self.name_of(first),
            self.name_of(second)
        ))
    }

    pub fn guardian_protect(
        &mut self,
        guardian_id: u64,
        target_id: u64,
    ) -> Result<String, GameError> {
        let idx = self.night_actor(guardian_id, Role::Guardian)?;
        if self.last_protected == Some(target_id) {
            return Err(GameError::RepeatProtect);
        }
        if !self.living(target_id) {
            return Err(GameError::InvalidTarget);
        }

        self.protected_player = Some(target_id);
        if let Some(target) = self.players.iter_mut().find(|p| p.user_id == target_id) {
            target.is_protected = true;
        }
        self.players[idx].night_action_done = true;

        Ok(format!("You are protecting {} tonight.", self.name_of(target_id)))
    }

    /// One wolf's vote. Votes may change freely until every living wolf
    /// has voted; at that point the consensus target is fixed (plurality,
    /// ties to the lowest user id) and further votes are rejected.
    pub fn wolf_vote(&mut self, wolf_id: u64, target_id: u64) -> Result<String, GameError> {
        if self.phase != GamePhase::Night {
            return Err(GameError::WrongPhase);
        }
        if self.wolf_target.is_some() {
            return Err(GameError::AlreadyActed);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.user_id == wolf_id)
            .ok_or(GameError::NotInGame)?;
        if !self.players[idx].is_wolf() {
            return Err(GameError::WrongRole("Werewolf"));
        }
        if !self.players[idx].is_alive {
            return Err(GameError::Dead);
        }
        match self.player(target_id) {
            Some(t) if t.is_alive && !t.is_wolf() => {}
            _ => return Err(GameError::InvalidTarget),
        }

        self.players[idx].vote = Some(target_id);
        self.players[idx].night_action_done = true;

        let (votes, wolf_count) = {
            let wolves = self.alive_wolves();
            let votes: Vec<u64> = wolves.iter().filter_map(|w| w.vote).collect();
            (votes, wolves.len())
        };

        if votes.len() == wolf_count {
            let ranking = tally_votes(votes.into_iter());
            // Non-empty: every living wolf, including the caller, has voted.
            let victim = ranking.first().map(|(id, _)| *id).unwrap_or(target_id);
            self.wolf_target = Some(victim);
            Ok(format!("The wolves have chosen {}.", self.name_of(victim)))
        } else {
            Ok(format!(
                "Vote registered. ({}/{} wolves have voted)",
                votes.len(),
                wolf_count
            ))
        }
    }

    pub fn seer_inspect(&mut self, seer_id: u64, target_id: u64) -> Result<String, GameError> {
        let idx = self.night_actor(seer_id, Role::Seer)?;
        let (name, role) = match self.player(target_id) {
            Some(t) if t.is_alive => match t.role {
                Some(role) => (t.name.clone(), role),
                None => return Err(GameError::InvalidTarget),
            },
            _ => return Err(GameError::InvalidTarget),
        };
        self.players[idx].night_action_done = true;

        let info = role.info();
        if role == Role::Werewolf {
            Ok(format!("{} is a {} WEREWOLF!", name, info.emoji))
        } else {
            Ok(format!("{} is {} {}.", name, info.emoji, info.name))
        }
    }

    /// The witch acts once per night, after the wolves have fixed their
    /// victim. Heal and kill are independent one-shot potions; declining
    /// both still counts as acting.
    pub fn witch_act(
        &mut self,
        witch_id: u64,
        heal: bool,
        kill_target: Option<u64>,
    ) -> Result<String, GameError> {
        let idx = self.night_actor(witch_id, Role::Witch)?;
        let victim = self.wolf_target.ok_or(GameError::WolvesUndecided)?;

        if heal && self.witch_heal_used {
            return Err(GameError::PotionSpent);
        }
        if let Some(kill) = kill_target {
            if self.witch_kill_used {
                return Err(GameError::PotionSpent);
            }
            if !self.living(kill) {
                return Err(GameError::InvalidTarget);
            }
        }

        let mut messages = Vec::new();
        if heal {
            self.witch_heal_target = Some(victim);
            self.witch_heal_used = true;
            messages.push(format!(
                "You use the life potion to save {}.",
                self.name_of(victim)
            ));
        }
        if let Some(kill) = kill_target {
            self.witch_kill_target = Some(kill);
            self.witch_kill_used = true;
            messages.push(format!("You use the death potion on {}.", self.name_of(kill)));
        }
        self.players[idx].night_action_done = true;

        if messages.is_empty() {
            Ok("You keep your potions tonight.".to_string())
        } else {
            Ok(messages.join("\n"))
        }
    }

    /// The piper enchants two players per night; the marks are permanent.
    pub fn piper_enchant(
        &mut self,
        piper_id: u64,
        first: u64,
        second: u64,
    ) -> Result<String, GameError> {
        let idx = self.night_actor(piper_id, Role::PiedPiper)?;
        if first == second
            || first == piper_id
            || second == piper_id
            || !self.living(first)
            || !self.living(second)
        {
            return Err(GameError::InvalidTarget);
        }

        for id in [first, second] {
            if let Some(p) = self.players.iter_mut().find(|p| p.user_id == id) {
                p.is_enchanted = true;
            }
        }
        self.players[idx].night_action_done = true;

        Ok(format!(
            "You have enchanted {} and {}.",
            self.name_of(first),
            self.name_of(second)
        ))
    }

    // --- night resolution ---

    /// True once every outstanding night action has been performed. Pure
    /// query; the owning layer decides when to call `resolve_night`.
    pub fn is_night_complete(&self) -> bool {
        if self.phase != GamePhase::Night {
            return false;
        }
        let mut wolves_present = false;
        for p in self.players.iter().filter(|p| p.is_alive) {
            match p.role {
                Some(Role::Cupid) => {
                    if self.day_number == 1 && !p.night_action_done {
                        return false;
                    }
                }
                Some(Role::Guardian) | Some(Role::Seer) | Some(Role::Witch) => {
                    if !p.night_action_done {
                        return false;
                    }
                }
                Some(Role::PiedPiper) => {
                    let others = self
                        .players
                        .iter()
                        .filter(|q| q.is_alive && q.user_id != p.user_id)
                        .count();
                    if others >= 2 && !p.night_action_done {
                        return false;
                    }
                }
                Some(Role::Werewolf) => wolves_present = true,
                _ => {}
            }
        }
        !wolves_present || self.wolf_target.is_some()
    }

    /// Applies the night's outcome: the wolves' victim (unless protected
    /// or healed), the witch's poison, and the single-level lover cascade.
    /// Transitions to DayDiscussion or Finished and returns the dawn
    /// narration.
    pub fn resolve_night(&mut self) -> String {
        let mut deaths: Vec<u64> = Vec::new();

        if let Some(victim) = self.wolf_target {
            let protected = self.player(victim).map_or(false, |p| p.is_protected);
            let healed = self.witch_heal_target == Some(victim);
            if self.living(victim) && !protected && !healed {
                deaths.push(victim);
            }
        }
        if let Some(victim) = self.witch_kill_target {
            if self.living(victim) && !deaths.contains(&victim) {
                deaths.push(victim);
            }
        }

        let mut i = 0;
        while i < deaths.len() {
            let dead_id = deaths[i];
            if let Some(p) = self.players.iter_mut().find(|p| p.user_id == dead_id) {
                p.is_alive = false;
            }
            if let Some(lover) = self.kill_lover_of(dead_id) {
                if !deaths.contains(&lover) {
                    deaths.push(lover);
                }
            }
            i += 1;
        }

        self.night_deaths = deaths.clone();
        self.last_protected = self.protected_player;
        self.night_phase = NightPhase::Done;

        let mut msg = if deaths.is_empty() {
            format!(
                "DAY {}\n\nDawn breaks over the village. Nobody died last night.",
                self.day_number
            )
        } else {
            let names: Vec<String> = deaths.iter().map(|id| self.name_of(*id)).collect();
            format!(
                "DAY {}\n\nDawn breaks over the village.\n\nDead: {}",
                self.day_number,
                names.join(", ")
            )
        };

        self.clear_night_transients();

        if let Some((result, win)) = self.check_winner() {
            self.phase = GamePhase::Finished;
            self.result = result;
            msg.push_str("\n\n");
            msg.push_str(&win);
            return msg;
        }

        self.phase = GamePhase::DayDiscussion;
        msg.push_str("\n\nTime to debate. Start the vote when everyone is ready.");
        msg
    }

    // --- day voting ---

    pub fn start_voting(&mut self) -> Result<String, GameError> {
        if self.phase != GamePhase::DayDiscussion {
            return Err(GameError::WrongPhase);
        }
        self.phase = GamePhase::DayVoting;
        for p in &mut self.players {
            p.vote = None;
        }
        Ok(format!(
            "VOTE\n\nChoose who to lynch. ({} players alive)",
            self.alive_players().len()
        ))
    }

    pub fn day_vote(&mut self, voter_id: u64, target_id: u64) -> Result<String, GameError> {
        if self.phase != GamePhase::DayVoting {
            return Err(GameError::WrongPhase);
        }
        if self.pending_hunter.is_some() {
            return Err(GameError::AwaitingHunter);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.user_id == voter_id)
            .ok_or(GameError::NotInGame)?;
        if !self.players[idx].is_alive {
            return Err(GameError::Dead);
        }
        if !self.living(target_id) {
            return Err(GameError::InvalidTarget);
        }

        self.players[idx].vote = Some(target_id);

        let (voted, alive_count) = {
            let alive = self.alive_players();
            (
                alive.iter().filter(|p| p.vote.is_some()).count(),
                alive.len(),
            )
        };
        if voted == alive_count {
            return Ok(self.resolve_voting());
        }

        Ok(format!("Vote registered. ({}/{})", voted, alive_count))
    }

    /// Plurality lynch. No votes or a strict top tie spare everyone; a
    /// lynched Hunter parks the cycle until the shot is taken.
    fn resolve_voting(&mut self) -> String {
        let ranking = tally_votes(
            self.players
                .iter()
                .filter(|p| p.is_alive)
                .filter_map(|p| p.vote),
        );

        let lynched_id = match ranking.first().copied() {
            None => {
                return format!("Nobody was lynched.\n\n{}", self.next_night());
            }
            Some((_, top)) if ranking.len() > 1 && ranking[1].1 == top => {
                return format!(
                    "The vote is tied. Nobody was lynched.\n\n{}",
                    self.next_night()
                );
            }
            Some((id, _)) => id,
        };

        let mut msg = format!("The village has decided to lynch {}.\n", self.name_of(lynched_id));
        let mut lynched_role = None;
        if let Some(p) = self.players.iter_mut().find(|p| p.user_id == lynched_id) {
            p.is_alive = false;
            lynched_role = p.role;
        }
        if let Some(role) = lynched_role {
            let info = role.info();
            msg.push_str(&format!("They were: {} {}\n", info.emoji, info.name));
        }

        if let Some(lover) = self.kill_lover_of(lynched_id) {
            msg.push_str(&self.heartbreak_line(lover));
        }

        if let Some((result, win)) = self.check_winner() {
            self.phase = GamePhase::Finished;
            self.result = result;
            msg.push('\n');
            msg.push_str(&win);
            return msg;
        }

        if lynched_role == Some(Role::Hunter) {
            self.pending_hunter = Some(lynched_id);
            msg.push_str("\nThe Hunter may take someone down with them! Take the shot.");
            return msg;
        }

        msg.push('\n');
        msg.push_str(&self.next_night());
        msg
    }

    /// The parked Hunter's retaliation; resumes the cycle afterwards.
    pub fn hunter_shot(&mut self, hunter_id: u64, target_id: u64) -> Result<String, GameError> {
        if self.pending_hunter != Some(hunter_id) {
            return Err(GameError::NoPendingShot);
        }
        if !self.living(target_id) {
            return Err(GameError::InvalidTarget);
        }

        let mut target_role = None;
        if let Some(p) = self.players.iter_mut().find(|p| p.user_id == target_id) {
            p.is_alive = false;
            target_role = p.role;
        }
        self.pending_hunter = None;

        let mut msg = format!("The Hunter shoots {}!\n", self.name_of(target_id));
        if let Some(role) = target_role {
            let info = role.info();
            msg.push_str(&format!("They were: {} {}\n", info.emoji, info.name));
        }

        if let Some(lover) = self.kill_lover_of(target_id) {
            msg.push_str(&self.heartbreak_line(lover));
        }

        if let Some((result, win)) = self.check_winner() {
            self.phase = GamePhase::Finished;
            self.result = result;
            msg.push('\n');
            msg.push_str(&win);
            return Ok(msg);
        }

        msg.push('\n');
        msg.push_str(&self.next_night());
        Ok(msg)
    }

    // --- win evaluation ---

    /// First matching rule wins; never mutates, the caller applies the
    /// Finished transition.
    pub fn check_winner(&self) -> Option<(GameResult, String)> {
        let alive = self.alive_players();
        let wolves = alive.iter().filter(|p| p.is_wolf()).count();
        let non_wolves = alive.len() - wolves;

        if wolves == 0 {
            return Some((
                GameResult::VillagersWin,
                "THE VILLAGERS WIN! All wolves have been eliminated.".to_string(),
            ));
        }
        if wolves >= non_wolves {
            return Some((
                GameResult::WolvesWin,
                "THE WEREWOLVES WIN! They have matched or outnumbered the villagers.".to_string(),
            ));
        }
        if let Some(piper) = alive.iter().find(|p| p.role == Some(Role::PiedPiper)) {
            if alive
                .iter()
                .filter(|p| p.user_id != piper.user_id)
                .all(|p| p.is_enchanted)
            {
                return Some((
                    GameResult::PiperWin,
                    format!(
                        "THE PIED PIPER ({}) WINS! Every survivor is enchanted.",
                        piper.name
                    ),
                ));
            }
        }
        None
    }

    // --- queries ---

    pub fn players_list(&self) -> String {
        let mut lines = vec!["Players:".to_string()];
        for (i, p) in self.players.iter().enumerate() {
            let status = if p.is_alive { "" } else { " (dead)" };
            let creator = if p.user_id == self.creator_id {
                " (creator)"
            } else {
                ""
            };
            lines.push(format!("{}. {}{}{}", i + 1, p.name, status, creator));
        }
        lines.join("\n")
    }

    pub fn alive_list(&self) -> String {
        let alive = self.alive_players();
        let mut lines = vec![format!("Players alive ({}):", alive.len())];
        for (i, p) in alive.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, p.name));
        }
        lines.join("\n")
    }

    // --- internals ---

    fn night_start_message(&self) -> String {
        format!(
            "NIGHT {}\n\nThe village sleeps... Roles with night actions will be contacted.",
            self.day_number
        )
    }

    fn next_night(&mut self) -> String {
        self.phase = GamePhase::Night;
        self.day_number += 1;
        self.reset_night();
        self.night_start_message()
    }

    fn reset_night(&mut self) {
        self.night_phase = if self.day_number <= 1 {
            NightPhase::Cupid
        } else {
            NightPhase::Guardian
        };
        self.clear_night_transients();
        self.night_deaths.clear();
        self.pending_hunter = None;
        for p in &mut self.players {
            p.vote = None;
        }
    }

    fn clear_night_transients(&mut self) {
        self.wolf_target = None;
        self.protected_player = None;
        self.witch_heal_target = None;
        self.witch_kill_target = None;
        for p in &mut self.players {
            p.is_protected = false;
            p.night_action_done = false;
        }
    }

    /// Single-level love cascade: kills the still-living lover of
    /// `dead_id`, if any, and reports who fell. Partners point back at
    /// each other, so the cascade never chases further.
    fn kill_lover_of(&mut self, dead_id: u64) -> Option<u64> {
        let lover_id = self.player(dead_id).and_then(|p| p.lover_id)?;
        let lover = self
            .players
            .iter_mut()
            .find(|p| p.user_id == lover_id && p.is_alive)?;
        lover.is_alive = false;
        Some(lover_id)
    }

    fn heartbreak_line(&self, lover_id: u64) -> String {
        let mut line = format!("\n{} dies of heartbreak.", self.name_of(lover_id));
        if let Some(role) = self.player(lover_id).and_then(|p| p.role) {
            let info = role.info();
            line.push_str(&format!(" They were: {} {}", info.emoji, info.name));
        }
        line.push('\n');
        line
    }
}

/// Vote counts sorted by count descending, then user id ascending, so the
/// front of the ranking is the deterministic plurality pick.
fn tally_votes(votes: impl Iterator<Item = u64>) -> Vec<(u64, usize)> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for v in votes {
        *counts.entry(v).or_insert(0) += 1;
    }
    let mut ranking: Vec<(u64, usize)> = counts.into_iter().collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_ranks_by_count_then_lowest_id() {
        let ranking = tally_votes([3, 2, 2, 5, 3].into_iter());
        assert_eq!(ranking[0], (2, 2));
        assert_eq!(ranking[1], (3, 2));
        assert_eq!(ranking[2], (5, 1));
    }

    #[test]
    fn join_is_lobby_only_and_rejects_duplicates() {
        let mut game = WerewolfGame::new("chat".into(), 1);
        game.add_player(1, "Ana".into(), None).unwrap();
        assert_eq!(
            game.add_player(1, "Ana".into(), None),
            Err(GameError::AlreadyJoined)
        );
        for id in 2..=6 {
            game.add_player(id, format!("P{}", id), None).unwrap();
        }
        game.start(1).unwrap();
        assert_eq!(
            game.add_player(7, "Late".into(), None),
            Err(GameError::AlreadyStarted)
        );
    }

    #[test]
    fn start_requires_creator_and_minimum() {
        let mut game = WerewolfGame::new("chat".into(), 1);
        game.add_player(1, "Ana".into(), None).unwrap();
        assert_eq!(game.start(2), Err(GameError::NotCreator));
        assert_eq!(game.start(1), Err(GameError::NotEnoughPlayers(6)));
        for id in 2..=6 {
            game.add_player(id, format!("P{}", id), None).unwrap();
        }
        let msg = game.start(1).unwrap();
        assert!(msg.starts_with("NIGHT 1"));
        assert_eq!(game.phase, GamePhase::Night);
        assert_eq!(game.day_number, 1);
        assert!(game.players.iter().all(|p| p.role.is_some()));
    }

    #[test]
    fn leaving_mid_game_is_rejected() {
        let mut game = WerewolfGame::new("chat".into(), 1);
        for id in 1..=6 {
            game.add_player(id, format!("P{}", id), None).unwrap();
        }
        game.start(1).unwrap();
        assert_eq!(game.remove_player(3), Err(GameError::AlreadyStarted));
    }
}
