use std::{io, time::Duration};

use rand::Rng;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    data::Grid,
    error::Result,
    logic::{Game, Phase},
    model::{
        client::ClientMessage,
        server::{ServerMessage, changed_cells},
    },
};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Drives one game from line-delimited JSON actions and answers with
/// line-delimited JSON messages.
pub struct Session<R, W> {
    game: Game<R>,
    output: W,
}

impl<R: Rng, W: AsyncWrite + Unpin> Session<R, W> {
    pub fn new(game: Game<R>, output: W) -> Self {
        Self { game, output }
    }

    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until `input` reaches end of file. Actions and clock ticks are
    /// handled one at a time; the clock only runs while the game is live and
    /// restarts whenever the game goes live.
    pub async fn run<I: AsyncBufRead + Unpin>(&mut self, input: I) -> io::Result<()> {
        let mut lines = input.lines();
        let mut interval = time::interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Session started");
        self.send(&ServerMessage::Init {
            snapshot: self.game.snapshot(),
        })
        .await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    let was_live = self.game.phase() == Phase::Live;
                    self.handle_line(&line).await?;
                    if !was_live && self.game.phase() == Phase::Live {
                        interval.reset();
                    }
                }
                _ = interval.tick(), if self.game.phase() == Phase::Live => {
                    if self.game.tick() {
                        self.send(&ServerMessage::Tick {
                            elapsed: self.game.elapsed(),
                        })
                        .await?;
                    }
                }
            }
        }

        info!("Session ended");
        Ok(())
    }

    pub async fn handle_line(&mut self, line: &str) -> io::Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let message = match serde_json::from_str::<ClientMessage>(line) {
            Ok(message) => message,
            Err(e) => {
                warn!("Malformed message {:?}: {}", line, e);
                return self
                    .send(&ServerMessage::Error {
                        message: format!("Malformed message: {}", e),
                    })
                    .await;
            }
        };

        match self.apply(message) {
            Ok(Some(reply)) => self.send(&reply).await,
            Ok(None) => Ok(()),
            Err(e) => {
                warn!("Rejected {:?}: {}", message, e);
                self.send(&ServerMessage::Error {
                    message: e.to_string(),
                })
                .await
            }
        }
    }

    fn apply(&mut self, message: ClientMessage) -> Result<Option<ServerMessage>> {
        match message {
            ClientMessage::Open { pos } => {
                let before = self.game.grid();
                let outcome = self.game.open(pos)?;
                debug!("Open ({}, {}): {:?}", pos.row, pos.col, outcome);
                Ok(outcome.has_update().then(|| self.update(&before)))
            }
            ClientMessage::Flag { pos } => {
                let before = self.game.grid();
                let outcome = self.game.toggle_flag(pos)?;
                debug!("Flag ({}, {}): {:?}", pos.row, pos.col, outcome);
                Ok(outcome.has_update().then(|| self.update(&before)))
            }
            ClientMessage::Reset => {
                self.game.reset()?;
                Ok(Some(ServerMessage::Init {
                    snapshot: self.game.snapshot(),
                }))
            }
        }
    }

    fn update(&self, before: &Grid) -> ServerMessage {
        ServerMessage::Update {
            updates: changed_cells(before, &self.game.grid()),
            phase: self.game.phase(),
            remaining_flags: self.game.remaining_flags(),
        }
    }

    async fn send(&mut self, message: &ServerMessage) -> io::Result<()> {
        let mut text = serde_json::to_string(message).map_err(io::Error::other)?;
        text.push('\n');
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use tokio::io::{AsyncWriteExt, BufReader};

    use super::*;
    use crate::{
        data::CellState,
        model::{Pos, server::CellUpdate},
    };

    fn session(mines: &[(usize, usize)]) -> Session<StdRng, Vec<u8>> {
        let mines: Vec<Pos> = mines.iter().map(|&pos| pos.into()).collect();
        let grid = Grid::from_mines(3, 3, &mines).unwrap();
        let game = Game::from_grid(grid, StdRng::seed_from_u64(5)).unwrap();
        Session::new(game, Vec::new())
    }

    fn messages(output: Vec<u8>) -> Vec<ServerMessage> {
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn replies_to_each_action() {
        let mut session = session(&[(2, 2)]);
        let input = concat!(
            r#"{"action":"open","pos":{"row":1,"col":1}}"#,
            "\n",
            "not json\n",
            "\n",
            r#"{"action":"open","pos":{"row":5,"col":5}}"#,
            "\n",
            r#"{"action":"flag","pos":{"row":0,"col":0}}"#,
            "\n",
            r#"{"action":"open","pos":{"row":0,"col":0}}"#,
            "\n",
            r#"{"action":"reset"}"#,
            "\n",
        );

        session.run(input.as_bytes()).await.unwrap();
        let messages = messages(session.into_output());

        assert_eq!(messages.len(), 6);
        assert!(matches!(&messages[0], ServerMessage::Init { snapshot } if snapshot.phase == Phase::Idle));
        match &messages[1] {
            ServerMessage::Update {
                updates,
                phase,
                remaining_flags,
            } => {
                assert_eq!(updates.len(), 1);
                assert_eq!(updates[0].pos, Pos::new(1, 1));
                assert_eq!(updates[0].cell.state, CellState::Visible);
                assert_eq!(*phase, Phase::Live);
                assert_eq!(*remaining_flags, 1);
            }
            other => panic!("unexpected message {:?}", other),
        }
        assert!(matches!(&messages[2], ServerMessage::Error { message } if message.starts_with("Malformed")));
        assert_eq!(
            messages[3],
            ServerMessage::Error {
                message: "Position (5, 5) is outside the grid".to_string()
            }
        );
        match &messages[4] {
            ServerMessage::Update {
                updates,
                remaining_flags,
                ..
            } => {
                assert_eq!(updates.len(), 1);
                assert_eq!(updates[0].cell.state, CellState::Flagged);
                assert_eq!(*remaining_flags, 0);
            }
            other => panic!("unexpected message {:?}", other),
        }
        match &messages[5] {
            ServerMessage::Init { snapshot } => {
                assert_eq!(snapshot.phase, Phase::Idle);
                assert_eq!(snapshot.remaining_flags, 1);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[tokio::test]
    async fn winning_update_flags_mines() {
        let mut session = session(&[(2, 2)]);
        session
            .handle_line(r#"{"action":"open","pos":{"row":0,"col":0}}"#)
            .await
            .unwrap();

        assert_eq!(session.game().phase(), Phase::Won);
        let messages = messages(session.into_output());
        match &messages[..] {
            [ServerMessage::Update { updates, phase, .. }] => {
                assert_eq!(*phase, Phase::Won);
                assert_eq!(updates.len(), 9);
                assert!(updates.contains(&CellUpdate {
                    pos: Pos::new(2, 2),
                    cell: crate::data::Cell {
                        value: crate::data::CellValue::Bomb,
                        state: CellState::Flagged,
                        clicked: false,
                    },
                }));
            }
            other => panic!("unexpected messages {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn clock_ticks_once_per_second_while_live() {
        let mut session = session(&[(0, 0), (2, 2)]);
        let (mut input_tx, input_rx) = tokio::io::duplex(1024);

        let driver = async move {
            input_tx
                .write_all(b"{\"action\":\"open\",\"pos\":{\"row\":0,\"col\":2}}\n")
                .await
                .unwrap();
            time::sleep(Duration::from_millis(3500)).await;
            drop(input_tx);
        };
        let (_, result) = tokio::join!(driver, session.run(BufReader::new(input_rx)));
        result.unwrap();

        assert_eq!(session.game().elapsed(), 3);
        let ticks: Vec<u32> = messages(session.into_output())
            .into_iter()
            .filter_map(|message| match message {
                ServerMessage::Tick { elapsed } => Some(elapsed),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn clock_stays_still_before_first_open() {
        let mut session = session(&[(2, 2)]);
        let (input_tx, input_rx) = tokio::io::duplex(1024);

        let driver = async move {
            time::sleep(Duration::from_secs(5)).await;
            drop(input_tx);
        };
        let (_, result) = tokio::join!(driver, session.run(BufReader::new(input_rx)));
        result.unwrap();

        assert_eq!(session.game().elapsed(), 0);
        assert_eq!(messages(session.into_output()).len(), 1);
    }
}
