use rand::seq::{IteratorRandom, SliceRandom};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::GameError;

pub const MIN_PLAYERS: usize = 3;

/// Secret words the impostor has to bluff around.
const WORDS: &[&str] = &[
    "lighthouse", "volcano", "submarine", "orchestra", "carnival", "glacier",
    "pyramid", "telescope", "waterfall", "labyrinth", "scarecrow", "hurricane",
    "campfire", "avalanche", "windmill", "aquarium", "parachute", "fireworks",
    "shipwreck", "jungle", "desert", "castle", "circus", "harbor",
];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImpostorPhase {
    Lobby,
    Playing,
    Voting,
    Finished,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImpostorPlayer {
    pub user_id: u64,
    pub name: String,
    pub username: Option<String>,
    pub is_impostor: bool,
    pub has_seen_role: bool,
    pub vote: Option<u64>,
}

/// One round of the hidden-word game: everyone but the impostor knows the
/// word, one vote decides whether the table finds them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImpostorGame {
    pub chat_id: String,
    pub creator_id: u64,
    pub phase: ImpostorPhase,
    /// Join order.
    pub players: Vec<ImpostorPlayer>,
    pub word: String,
    pub impostor_id: Option<u64>,
    pub min_players: usize,
}

impl ImpostorGame {
    pub fn new(chat_id: String, creator_id: u64) -> Self {
        ImpostorGame {
            chat_id,
            creator_id,
            phase: ImpostorPhase::Lobby,
            players: Vec::new(),
            word: String::new(),
            impostor_id: None,
            min_players: MIN_PLAYERS,
        }
    }

    pub fn add_player(
        &mut self,
        user_id: u64,
        name: String,
        username: Option<String>,
    ) -> Result<String, GameError> {
        if self.phase != ImpostorPhase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        if self.player(user_id).is_some() {
            return Err(GameError::AlreadyJoined);
        }
        self.players.push(ImpostorPlayer {
            user_id,
            name: name.clone(),
            username,
            is_impostor: false,
            has_seen_role: false,
            vote: None,
        });
        Ok(format!("{} joined! ({} players)", name, self.players.len()))
    }

    pub fn remove_player(&mut self, user_id: u64) -> Result<String, GameError> {
        if self.phase != ImpostorPhase::Lobby {
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
        if self.phase != ImpostorPhase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        if user_id != self.creator_id {
            return Err(GameError::NotCreator);
        }
        if self.players.len() < self.min_players {
            return Err(GameError::NotEnoughPlayers(self.min_players));
        }

        let mut rng = rand::thread_rng();
        self.word = WORDS.choose(&mut rng).copied().unwrap_or("lighthouse").to_string();
        let impostor = self
            .players
            .iter()
            .map(|p| p.user_id)
            .choose(&mut rng)
            .unwrap_or(self.creator_id);
        self.impostor_id = Some(impostor);
        if let Some(p) = self.players.iter_mut().find(|p| p.user_id == impostor) {
            p.is_impostor = true;
        }
        self.phase = ImpostorPhase::Playing;

        Ok("The game has begun! Check your word privately.".to_string())
    }

    pub fn player_role(&mut self, user_id: u64) -> Result<String, GameError> {
        if self.phase != ImpostorPhase::Playing {
            return Err(GameError::WrongPhase);
        }
        let player = self
            .players
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .ok_or(GameError::NotInGame)?;
        player.has_seen_role = true;

        if player.is_impostor {
            Ok("You are the IMPOSTOR! You do not know the secret word. Figure it out without getting caught.".to_string())
        } else {
            Ok(format!("The secret word is: {}", self.word))
        }
    }

    pub fn all_players_seen_role(&self) -> bool {
        self.players.iter().all(|p| p.has_seen_role)
    }

    pub fn start_voting(&mut self) -> Result<String, GameError> {
        if self.phase != ImpostorPhase::Playing {
            return Err(GameError::WrongPhase);
        }
        self.phase = ImpostorPhase::Voting;
        for p in &mut self.players {
            p.vote = None;
        }
        Ok("The vote is open! Pick whoever you think is the impostor.".to_string())
    }

    pub fn vote(&mut self, voter_id: u64, target_id: u64) -> Result<String, GameError> {
        if self.phase != ImpostorPhase::Voting {
            return Err(GameError::WrongPhase);
        }
        if voter_id == target_id {
            return Err(GameError::SelfVote);
        }
        if self.player(target_id).is_none() {
            return Err(GameError::InvalidTarget);
        }
        let voter = self
            .players
            .iter_mut()
            .find(|p| p.user_id == voter_id)
            .ok_or(GameError::NotInGame)?;
        voter.vote = Some(target_id);

        let voted = self.players.iter().filter(|p| p.vote.is_some()).count();
        Ok(format!("Vote registered! ({}/{})", voted, self.players.len()))
    }

    pub fn all_voted(&self) -> bool {
        self.players.iter().all(|p| p.vote.is_some())
    }

    /// Closes the round: the table wins only if the unique plurality pick
    /// is the impostor. Ties or scattered votes let the impostor walk.
    pub fn results(&mut self) -> String {
        self.phase = ImpostorPhase::Finished;

        let mut counts: HashMap<u64, usize> = HashMap::new();
        for p in &self.players {
            if let Some(target) = p.vote {
                *counts.entry(target).or_insert(0) += 1;
            }
        }

        let mut result = String::from("RESULTS:\n\n");
        for p in &self.players {
            let voted_name = p
                .vote
                .and_then(|id| self.player(id))
                .map(|t| t.name.as_str())
                .unwrap_or("Nobody");
            result.push_str(&format!("{} voted for: {}\n", p.name, voted_name));
        }

        let impostor_name = self
            .impostor_id
            .and_then(|id| self.player(id))
            .map(|p| p.name.clone())
            .unwrap_or_default();
        result.push_str(&format!("\nThe word was: {}\n", self.word));
        result.push_str(&format!("The impostor was: {}\n\n", impostor_name));

        let max_votes = counts.values().copied().max().unwrap_or(0);
        let top: Vec<u64> = counts
            .iter()
            .filter(|(_, n)| **n == max_votes)
            .map(|(id, _)| *id)
            .collect();

        if max_votes > 0 && top.len() == 1 && Some(top[0]) == self.impostor_id {
            result.push_str("THE PLAYERS WIN! They found the impostor!");
        } else {
            result.push_str("THE IMPOSTOR WINS! Nobody caught them!");
        }
        result
    }

    pub fn players_list(&self) -> String {
        if self.players.is_empty() {
            return "No players yet.".to_string();
        }
        let mut lines = vec!["Players:".to_string()];
        for (i, p) in self.players.iter().enumerate() {
            let creator = if p.user_id == self.creator_id {
                " (creator)"
            } else {
                ""
            };
            lines.push(format!("{}. {}{}", i + 1, p.name, creator));
        }
        lines.join("\n")
    }

    fn player(&self, user_id: u64) -> Option<&ImpostorPlayer> {
        self.players.iter().find(|p| p.user_id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lobby_of(n: u64) -> ImpostorGame {
        let mut game = ImpostorGame::new("chat".into(), 1);
        for id in 1..=n {
            game.add_player(id, format!("P{}", id), None).unwrap();
        }
        game
    }

    #[test]
    fn start_picks_word_and_exactly_one_impostor() {
        let mut game = lobby_of(4);
        game.start(1).unwrap();
        assert_eq!(game.phase, ImpostorPhase::Playing);
        assert!(!game.word.is_empty());
        assert_eq!(game.players.iter().filter(|p| p.is_impostor).count(), 1);
        assert_eq!(
            game.players.iter().find(|p| p.is_impostor).map(|p| p.user_id),
            game.impostor_id
        );
    }

    #[test]
    fn self_vote_is_rejected() {
        let mut game = lobby_of(3);
        game.start(1).unwrap();
        game.start_voting().unwrap();
        assert_eq!(game.vote(2, 2), Err(GameError::SelfVote));
    }

    #[test]
    fn below_minimum_cannot_start() {
        let mut game = lobby_of(2);
        assert_eq!(game.start(1), Err(GameError::NotEnoughPlayers(3)));
    }
}
