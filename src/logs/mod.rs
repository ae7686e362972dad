//! Server log reading and following
//!
//! Reads the standard `logs/latest.log` the server writes. Follow mode
//! tails the file through a bounded channel while watching a stop
//! signal; the send and the stop-watch are always offered together so
//! the tailer can never wedge on a full channel after a stop.

use chrono::NaiveTime;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep, Duration};

use crate::error::{McinitError, McinitResult};

/// Poll interval while waiting for new log lines
const FOLLOW_INTERVAL: Duration = Duration::from_millis(100);

pub struct LogReader {
    log_path: PathBuf,
}

impl LogReader {
    pub fn new(server_dir: &Path) -> Self {
        Self {
            log_path: server_dir.join("logs").join("latest.log"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Last `lines` lines matching the filters (0 = all lines)
    pub async fn read(
        &self,
        lines: usize,
        grep: Option<&str>,
        since: Option<chrono::Duration>,
    ) -> McinitResult<Vec<String>> {
        let file = self.open().await?;
        let mut reader = BufReader::new(file).lines();

        let cutoff = since.map(|d| (chrono::Local::now() - d).time());
        let mut included = cutoff.is_none();
        let mut matching = Vec::new();

        while let Some(line) = reader
            .next_line()
            .await
            .map_err(|e| McinitError::io(format!("reading {}", self.log_path.display()), e))?
        {
            if let (Some(cutoff), Some(stamp)) = (cutoff, parse_log_time(&line)) {
                // log stamps carry no date; spans crossing midnight
                // are approximated
                included = stamp >= cutoff;
            }
            if !included {
                continue;
            }
            if let Some(pattern) = grep {
                if !matches_pattern(&line, pattern) {
                    continue;
                }
            }
            matching.push(line);
        }

        if lines > 0 && lines < matching.len() {
            matching.drain(..matching.len() - lines);
        }
        Ok(matching)
    }

    /// Tail the log from its current end, pushing matching lines into
    /// `tx` until `stop` fires or the consumer goes away
    pub async fn follow(
        &self,
        grep: Option<String>,
        tx: mpsc::Sender<String>,
        mut stop: watch::Receiver<bool>,
    ) -> McinitResult<()> {
        let mut file = self.open().await?;
        file.seek(SeekFrom::End(0))
            .await
            .map_err(|e| McinitError::io(format!("seeking {}", self.log_path.display()), e))?;

        let mut reader = BufReader::new(file);
        let mut buf = String::new();

        loop {
            buf.clear();
            let n = reader
                .read_line(&mut buf)
                .await
                .map_err(|e| McinitError::io(format!("reading {}", self.log_path.display()), e))?;

            if n == 0 {
                tokio::select! {
                    _ = stop.changed() => return Ok(()),
                    _ = sleep(FOLLOW_INTERVAL) => continue,
                }
            }

            let line = buf.trim_end_matches(['\n', '\r']).to_string();
            if let Some(pattern) = &grep {
                if !matches_pattern(&line, pattern) {
                    continue;
                }
            }

            tokio::select! {
                _ = stop.changed() => return Ok(()),
                sent = tx.send(line) => {
                    if sent.is_err() {
                        return Ok(());
                    }
                }
            }
        }
    }

    async fn open(&self) -> McinitResult<File> {
        match File::open(&self.log_path).await {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(McinitError::LogNotFound(self.log_path.clone()))
            }
            Err(e) => Err(McinitError::io(
                format!("opening {}", self.log_path.display()),
                e,
            )),
        }
    }
}

/// Case-insensitive substring match
pub fn matches_pattern(line: &str, pattern: &str) -> bool {
    if pattern.is_empty() {
        return true;
    }
    line.to_lowercase().contains(&pattern.to_lowercase())
}

/// Parse a duration suffix like `30s`, `10m`, `2h`, `1d`
pub fn parse_since(input: &str) -> McinitResult<chrono::Duration> {
    let input = input.trim();
    let (digits, unit) = input.split_at(input.len().saturating_sub(1));
    let value: i64 = digits
        .parse()
        .map_err(|_| McinitError::Internal(format!("invalid duration: {}", input)))?;

    match unit {
        "s" => Ok(chrono::Duration::seconds(value)),
        "m" => Ok(chrono::Duration::minutes(value)),
        "h" => Ok(chrono::Duration::hours(value)),
        "d" => Ok(chrono::Duration::days(value)),
        _ => Err(McinitError::Internal(format!("invalid duration: {}", input))),
    }
}

/// Extract the `[HH:MM:SS]` stamp Minecraft prefixes log lines with
fn parse_log_time(line: &str) -> Option<NaiveTime> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    NaiveTime::parse_from_str(&rest[..end], "%H:%M:%S").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncWriteExt;

    async fn write_log(dir: &Path, content: &str) {
        let logs = dir.join("logs");
        tokio::fs::create_dir_all(&logs).await.unwrap();
        tokio::fs::write(logs.join("latest.log"), content)
            .await
            .unwrap();
    }

    #[test]
    fn pattern_matching_is_case_insensitive() {
        assert!(matches_pattern("[12:00:00] [Server] ERROR: boom", "error"));
        assert!(!matches_pattern("[12:00:00] [Server] INFO: fine", "error"));
        assert!(matches_pattern("anything", ""));
    }

    #[test]
    fn since_parsing() {
        assert_eq!(parse_since("30s").unwrap(), chrono::Duration::seconds(30));
        assert_eq!(parse_since("10m").unwrap(), chrono::Duration::minutes(10));
        assert_eq!(parse_since("2h").unwrap(), chrono::Duration::hours(2));
        assert!(parse_since("10x").is_err());
        assert!(parse_since("").is_err());
    }

    #[test]
    fn log_time_parsing() {
        assert_eq!(
            parse_log_time("[13:05:09] [Server thread/INFO]: Done"),
            NaiveTime::from_hms_opt(13, 5, 9)
        );
        assert!(parse_log_time("no stamp here").is_none());
    }

    #[tokio::test]
    async fn read_tails_and_filters() {
        let temp = TempDir::new().unwrap();
        write_log(
            temp.path(),
            "[10:00:00] INFO: one\n[10:00:01] ERROR: two\n[10:00:02] INFO: three\n",
        )
        .await;

        let reader = LogReader::new(temp.path());

        let all = reader.read(0, None, None).await.unwrap();
        assert_eq!(all.len(), 3);

        let last_two = reader.read(2, None, None).await.unwrap();
        assert_eq!(last_two[0], "[10:00:01] ERROR: two");

        let errors = reader.read(0, Some("error"), None).await.unwrap();
        assert_eq!(errors.len(), 1);
    }

    #[tokio::test]
    async fn read_missing_log_fails() {
        let temp = TempDir::new().unwrap();
        let reader = LogReader::new(temp.path());
        assert!(matches!(
            reader.read(10, None, None).await,
            Err(McinitError::LogNotFound(_))
        ));
    }

    #[tokio::test]
    async fn follow_delivers_appended_lines() {
        let temp = TempDir::new().unwrap();
        write_log(temp.path(), "[10:00:00] INFO: old line\n").await;

        let reader = LogReader::new(temp.path());
        let (tx, mut rx) = mpsc::channel(16);
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move { reader.follow(None, tx, stop_rx).await });

        // append after the follower has seeked to EOF
        sleep(Duration::from_millis(200)).await;
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(temp.path().join("logs/latest.log"))
            .await
            .unwrap();
        file.write_all(b"[10:00:05] INFO: fresh line\n").await.unwrap();
        file.flush().await.unwrap();

        let line = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(line, "[10:00:05] INFO: fresh line");

        stop_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn follow_stops_even_when_channel_is_full() {
        let temp = TempDir::new().unwrap();
        write_log(temp.path(), "").await;

        let reader = LogReader::new(temp.path());
        // capacity 1 and nobody consuming
        let (tx, _rx) = mpsc::channel(1);
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move { reader.follow(None, tx, stop_rx).await });

        sleep(Duration::from_millis(200)).await;
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(temp.path().join("logs/latest.log"))
            .await
            .unwrap();
        // two lines: the second send would block forever on the full channel
        file.write_all(b"line one\nline two\n").await.unwrap();
        file.flush().await.unwrap();

        sleep(Duration::from_millis(300)).await;
        stop_tx.send(true).unwrap();

        // the tailer must exit despite the full channel
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("follower wedged on full channel")
            .unwrap()
            .unwrap();
    }
}
