//! Line-protocol game agent
//!
//! The supervisor exchange is:
//! 1. agent prints its name
//! 2. supervisor sends `color,depthLimit,useMinimax,useCaching,useOrdering`
//! 3. supervisor repeatedly sends `SCORE <dark> <light>` plus a board line,
//!    answered with `column row`, until `FINAL <dark> <light>`

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

use crate::alphabeta::AlphaBetaSearcher;
use crate::config::{AgentConfig, Algorithm};
use crate::minimax::{MinimaxSearcher, SearchResult};
use crate::othello::{Board, GameRules, Move, Othello, Player};

pub const DEFAULT_NAME: &str = "Othello AI";

/// Searcher selected by the handshake; lives for the whole session so
/// its caches carry over between moves.
pub enum Agent {
    Minimax(MinimaxSearcher),
    AlphaBeta(AlphaBetaSearcher),
}

impl Agent {
    pub fn from_config(config: &AgentConfig) -> Self {
        match config.algorithm {
            Algorithm::Minimax => Agent::Minimax(MinimaxSearcher::new(config.search)),
            Algorithm::AlphaBeta => Agent::AlphaBeta(AlphaBetaSearcher::new(config.search)),
        }
    }

    pub fn search(&mut self, board: &Board, player: Player) -> SearchResult {
        match self {
            Agent::Minimax(searcher) => searcher.search(board, player),
            Agent::AlphaBeta(searcher) => searcher.search(board, player),
        }
    }

    /// Searched move, or the first legal move when the depth limit
    /// leaves the search without one
    pub fn choose_move(&mut self, board: &Board, player: Player) -> Result<Move> {
        if let Some(mv) = self.search(board, player).best_move {
            return Ok(mv);
        }
        match Othello.possible_moves(board, player).first() {
            Some(&mv) => {
                tracing::warn!("search returned no move; playing first legal move {}", mv);
                Ok(mv)
            }
            None => bail!("no legal move for {:?} on this board:\n{}", player, board),
        }
    }
}

/// What happened during a session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub moves_played: usize,
    /// (dark, light) from the `FINAL` line, if one arrived
    pub final_score: Option<(u32, u32)>,
}

/// Play one game against the supervisor on `input`/`output`
pub fn run_session<R: BufRead, W: Write>(mut input: R, mut output: W, name: &str) -> Result<SessionSummary> {
    writeln!(output, "{}", name)?;
    output.flush()?;

    let Some(handshake) = read_line(&mut input)? else {
        bail!("supervisor closed the stream before the handshake");
    };
    let config: AgentConfig = handshake
        .parse()
        .with_context(|| format!("invalid handshake line {:?}", handshake.trim()))?;
    log_config(&config);

    let mut agent = Agent::from_config(&config);
    let mut summary = SessionSummary::default();

    while let Some(line) = read_line(&mut input)? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (status, score) = parse_status(line)?;

        match status {
            "FINAL" => {
                tracing::info!("game over: dark {} light {}", score.0, score.1);
                summary.final_score = Some(score);
                return Ok(summary);
            }
            "SCORE" => {
                let Some(board_line) = read_line(&mut input)? else {
                    bail!("supervisor closed the stream before sending a board");
                };
                let board: Board = board_line
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid board {:?}", board_line.trim()))?;
                let mv = agent.choose_move(&board, config.color)?;
                writeln!(output, "{}", mv)?;
                output.flush()?;
                summary.moves_played += 1;
            }
            other => bail!("unknown status {:?}", other),
        }
    }

    tracing::warn!("supervisor closed the stream without FINAL");
    Ok(summary)
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line).context("failed to read from supervisor")? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn parse_status(line: &str) -> Result<(&str, (u32, u32))> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [status, dark, light] = parts[..] else {
        bail!("malformed status line {:?}", line);
    };
    let dark = dark.parse().with_context(|| format!("bad dark score in {:?}", line))?;
    let light = light.parse().with_context(|| format!("bad light score in {:?}", line))?;
    Ok((status, (dark, light)))
}

fn log_config(config: &AgentConfig) {
    let search = &config.search;
    tracing::info!(
        "playing {:?} with {:?}: caching {}, ordering {}, depth limit {}",
        config.color,
        config.algorithm,
        if search.caching { "on" } else { "off" },
        if search.ordering { "on" } else { "off" },
        search.depth_limit.map_or("off".to_string(), |d| d.to_string())
    );
    if config.algorithm == Algorithm::Minimax && search.ordering {
        tracing::warn!("node ordering has no effect on minimax");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> (Result<SessionSummary>, String) {
        let mut output = Vec::new();
        let result = run_session(Cursor::new(input.to_string()), &mut output, DEFAULT_NAME);
        (result, String::from_utf8(output).unwrap())
    }

    const START_4X4: &str = "((0, 0, 0, 0), (0, 2, 1, 0), (0, 1, 2, 0), (0, 0, 0, 0))";

    #[test]
    fn test_full_exchange() {
        let input = format!("1,2,0,1,1\nSCORE 2 2\n{}\nFINAL 3 1\n", START_4X4);
        let (result, output) = run(&input);
        let summary = result.unwrap();
        assert_eq!(summary.moves_played, 1);
        assert_eq!(summary.final_score, Some((3, 1)));

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], DEFAULT_NAME);
        assert_eq!(lines.len(), 2);
        let coords: Vec<usize> = lines[1].split(' ').map(|v| v.parse().unwrap()).collect();
        let legal = Othello.possible_moves(&Board::initial(4), Player::Dark);
        assert!(legal.contains(&Move::new(coords[0], coords[1])));
    }

    #[test]
    fn test_nothing_after_final() {
        let input = format!("1,2,1,0,0\nFINAL 2 2\nSCORE 2 2\n{}\n", START_4X4);
        let (result, output) = run(&input);
        assert_eq!(result.unwrap().moves_played, 0);
        assert_eq!(output, format!("{}\n", DEFAULT_NAME));
    }

    #[test]
    fn test_depth_zero_falls_back_to_first_legal_move() {
        let input = format!("1,0,1,0,0\nSCORE 2 2\n{}\nFINAL 2 2\n", START_4X4);
        let (result, output) = run(&input);
        assert!(result.is_ok());
        assert_eq!(output.lines().nth(1), Some("0 1"));
    }

    #[test]
    fn test_no_legal_move_is_an_error() {
        let (result, _) = run("2,2,1,0,0\nSCORE 3 1\n((1, 1), (1, 2))\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_input_is_rejected() {
        assert!(run("").0.is_err());
        assert!(run("9,2,1,0,0\n").0.is_err());
        assert!(run("1,2,1,0,0\nSCORE 2\n").0.is_err());
        assert!(run("1,2,1,0,0\nMOVE 2 2\n").0.is_err());
        assert!(run("1,2,1,0,0\nSCORE 2 2\nprint('x')\n").0.is_err());
    }

    #[test]
    fn test_eof_without_final_ends_cleanly() {
        let (result, _) = run("1,2,1,0,0\n");
        assert_eq!(result.unwrap(), SessionSummary::default());
    }
}
