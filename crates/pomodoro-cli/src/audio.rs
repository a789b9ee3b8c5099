//! Sound: the alert played on mode changes and the background lofi track.
//!
//! Playback is delegated to the system audio player (`paplay`, falling back
//! to `aplay`). A missing player or missing file is logged and skipped.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// System sounds tried when no alarm file is configured.
const FALLBACK_ALARMS: [&str; 3] = [
    "/usr/share/sounds/freedesktop/stereo/complete.oga",
    "/usr/share/sounds/sound-icons/guitar-11.wav",
    "/usr/share/sounds/generic.wav",
];

/// Spawn the first available player for `path`.
fn spawn_player(path: &Path, volume: u32) -> io::Result<Child> {
    spawn_with(Path::new("paplay"), path, volume).or_else(|_| {
        Command::new("aplay")
            .arg("-q")
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    })
}

/// Spawn a paplay-compatible `program` for `path`.
fn spawn_with(program: &Path, path: &Path, volume: u32) -> io::Result<Child> {
    // paplay volume is linear 0..=65536.
    let pa_volume = u64::from(volume.min(100)) * 65536 / 100;
    Command::new(program)
        .arg(format!("--volume={pa_volume}"))
        .arg(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
}

// ── Alert ────────────────────────────────────────────────────────────

/// One-shot alert sound.
#[derive(Debug, Clone)]
pub struct AlertSound {
    path: Option<PathBuf>,
    volume: u32,
}

impl AlertSound {
    /// Use `configured` if given, otherwise the first system sound found.
    pub fn new(configured: Option<&str>, volume: u32) -> Self {
        let path = match configured {
            Some(p) => Some(PathBuf::from(p)),
            None => FALLBACK_ALARMS
                .iter()
                .map(PathBuf::from)
                .find(|p| p.exists()),
        };
        Self { path, volume }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Play without blocking the event loop.
    pub fn play(&self) {
        let Some(path) = self.path.clone() else {
            tracing::debug!("no alarm sound available");
            return;
        };
        if !path.exists() {
            tracing::warn!(path = %path.display(), "alarm sound not found");
            return;
        }

        let volume = self.volume;
        std::thread::spawn(move || match spawn_player(&path, volume) {
            Ok(mut child) => {
                let _ = child.wait();
            }
            Err(e) => tracing::warn!(error = %e, "failed to play alarm sound"),
        });
    }
}

// ── Lofi ─────────────────────────────────────────────────────────────

/// Low-level control of one playing track.
pub trait AudioBackend {
    fn play(&mut self, path: &Path, volume: u32) -> io::Result<()>;
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);

    /// True once the track has played to the end (or nothing was started).
    fn is_finished(&mut self) -> bool;
}

/// Plays through a child process; pause/resume stop and continue it.
#[derive(Debug, Default)]
pub struct ProcessBackend {
    child: Option<Child>,
    /// Player used instead of paplay/aplay.
    program: Option<PathBuf>,
}

impl ProcessBackend {
    /// Play through `program`, which takes paplay's arguments.
    #[cfg(test)]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            child: None,
            program: Some(program.into()),
        }
    }

    /// Pid of the current player process.
    #[cfg(test)]
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    fn signal(&self, signal: &str) {
        let Some(child) = &self.child else { return };
        if let Err(e) = send_signal(signal, child.id()) {
            tracing::warn!(error = %e, signal, "failed to signal lofi player");
        }
    }
}

fn send_signal(signal: &str, pid: u32) -> io::Result<std::process::ExitStatus> {
    Command::new("kill")
        .arg(signal)
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
}

impl AudioBackend for ProcessBackend {
    fn play(&mut self, path: &Path, volume: u32) -> io::Result<()> {
        self.stop();
        let child = match &self.program {
            Some(program) => spawn_with(program, path, volume)?,
            None => spawn_player(path, volume)?,
        };
        self.child = Some(child);
        Ok(())
    }

    fn pause(&mut self) {
        self.signal("-STOP");
    }

    fn resume(&mut self) {
        self.signal("-CONT");
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if !matches!(child.try_wait(), Ok(Some(_))) {
                // A stopped process must be continued before it can exit.
                let _ = send_signal("-CONT", child.id());
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }

    fn is_finished(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => !matches!(child.try_wait(), Ok(None)),
            None => true,
        }
    }
}

impl Drop for ProcessBackend {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LofiState {
    /// Nothing played yet; pause, resume and restart do nothing.
    Unloaded,
    Playing,
    Paused,
    /// The track played to the end; resume starts it over.
    Finished,
}

impl LofiState {
    pub fn label(self) -> &'static str {
        match self {
            LofiState::Unloaded => "unloaded",
            LofiState::Playing => "playing",
            LofiState::Paused => "paused",
            LofiState::Finished => "finished",
        }
    }
}

/// The lofi menu: play, pause, resume, restart.
#[derive(Debug)]
pub struct LofiPlayer<B: AudioBackend> {
    backend: B,
    track: Option<PathBuf>,
    volume: u32,
    state: LofiState,
}

impl<B: AudioBackend> LofiPlayer<B> {
    pub fn new(backend: B, track: Option<PathBuf>, volume: u32) -> Self {
        Self {
            backend,
            track,
            volume,
            state: LofiState::Unloaded,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current state, noticing a track that has ended since the last call.
    pub fn refresh(&mut self) -> LofiState {
        if matches!(self.state, LofiState::Playing | LofiState::Paused)
            && self.backend.is_finished()
        {
            tracing::debug!("lofi track ended");
            self.state = LofiState::Finished;
        }
        self.state
    }

    /// Load the track and play it from the start.
    pub fn play(&mut self) -> LofiState {
        let Some(track) = self.track.clone() else {
            tracing::warn!("no lofi track configured (set lofi.track)");
            return self.state;
        };
        if !track.exists() {
            tracing::warn!(path = %track.display(), "lofi track not found");
            return self.state;
        }
        self.start_track(&track)
    }

    pub fn pause(&mut self) -> LofiState {
        if self.refresh() == LofiState::Playing {
            self.backend.pause();
            self.state = LofiState::Paused;
        }
        self.state
    }

    pub fn resume(&mut self) -> LofiState {
        match self.refresh() {
            LofiState::Paused => {
                self.backend.resume();
                self.state = LofiState::Playing;
                self.state
            }
            LofiState::Finished => self.restart(),
            state => state,
        }
    }

    /// Stop and play from the beginning, once something has been played.
    pub fn restart(&mut self) -> LofiState {
        if self.refresh() == LofiState::Unloaded {
            return self.state;
        }
        match self.track.clone() {
            Some(track) => self.start_track(&track),
            None => self.state,
        }
    }

    fn start_track(&mut self, track: &Path) -> LofiState {
        self.backend.stop();
        match self.backend.play(track, self.volume) {
            Ok(()) => self.state = LofiState::Playing,
            Err(e) => {
                tracing::warn!(error = %e, "failed to start lofi player");
                self.state = LofiState::Unloaded;
            }
        }
        self.state
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct FakeBackend {
        pub calls: Vec<&'static str>,
        pub finished: bool,
    }

    impl AudioBackend for FakeBackend {
        fn play(&mut self, _path: &Path, _volume: u32) -> io::Result<()> {
            self.calls.push("play");
            self.finished = false;
            Ok(())
        }

        fn pause(&mut self) {
            self.calls.push("pause");
        }

        fn resume(&mut self) {
            self.calls.push("resume");
        }

        fn stop(&mut self) {
            self.calls.push("stop");
        }

        fn is_finished(&mut self) -> bool {
            self.finished
        }
    }

    fn fake_player(track: &Path) -> LofiPlayer<FakeBackend> {
        LofiPlayer::new(FakeBackend::default(), Some(track.to_path_buf()), 50)
    }

    #[test]
    fn controls_are_inert_before_play() {
        let track = tempfile::NamedTempFile::new().unwrap();
        let mut lofi = fake_player(track.path());
        assert_eq!(lofi.pause(), LofiState::Unloaded);
        assert_eq!(lofi.resume(), LofiState::Unloaded);
        assert_eq!(lofi.restart(), LofiState::Unloaded);
        assert!(lofi.backend().calls.is_empty());
    }

    #[test]
    fn play_pause_resume_restart() {
        let track = tempfile::NamedTempFile::new().unwrap();
        let mut lofi = fake_player(track.path());

        assert_eq!(lofi.play(), LofiState::Playing);
        assert_eq!(lofi.pause(), LofiState::Paused);
        assert_eq!(lofi.pause(), LofiState::Paused);
        assert_eq!(lofi.resume(), LofiState::Playing);
        assert_eq!(lofi.restart(), LofiState::Playing);
        assert_eq!(
            lofi.backend().calls,
            vec!["stop", "play", "pause", "resume", "stop", "play"]
        );
    }

    #[test]
    fn ended_track_is_not_paused() {
        let track = tempfile::NamedTempFile::new().unwrap();
        let mut lofi = fake_player(track.path());
        lofi.play();
        lofi.backend.finished = true;

        assert_eq!(lofi.pause(), LofiState::Finished);
        assert_eq!(lofi.backend().calls, vec!["stop", "play"]);
    }

    #[test]
    fn resume_after_end_plays_from_start() {
        let track = tempfile::NamedTempFile::new().unwrap();
        let mut lofi = fake_player(track.path());
        lofi.play();
        lofi.backend.finished = true;

        assert_eq!(lofi.refresh(), LofiState::Finished);
        assert_eq!(lofi.resume(), LofiState::Playing);
        assert_eq!(lofi.backend().calls, vec!["stop", "play", "stop", "play"]);
        assert_eq!(lofi.pause(), LofiState::Paused);
    }

    #[test]
    fn missing_track_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut lofi = fake_player(&dir.path().join("lofi.wav"));
        assert_eq!(lofi.play(), LofiState::Unloaded);

        let mut unset = LofiPlayer::new(FakeBackend::default(), None, 50);
        assert_eq!(unset.play(), LofiState::Unloaded);
        assert!(unset.backend().calls.is_empty());
    }

    #[test]
    fn alert_prefers_configured_path() {
        let alert = AlertSound::new(Some("/tmp/alarm_sound.wav"), 50);
        assert_eq!(alert.path(), Some(Path::new("/tmp/alarm_sound.wav")));
    }

    #[cfg(target_os = "linux")]
    mod process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::sync::Mutex;
        use std::time::{Duration, Instant};

        // Writing a script while another test forks can leave it busy (ETXTBSY).
        static SPAWN_LOCK: Mutex<()> = Mutex::new(());

        /// Write an executable stand-in for paplay that logs each run.
        fn fake_paplay(dir: &Path, body: &str) -> PathBuf {
            let script = dir.join("paplay");
            let log = dir.join("runs.log");
            std::fs::write(
                &script,
                format!("#!/bin/sh\necho run >> '{}'\n{body}\n", log.display()),
            )
            .unwrap();
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
            script
        }

        fn runs(dir: &Path) -> usize {
            std::fs::read_to_string(dir.join("runs.log"))
                .map(|s| s.lines().count())
                .unwrap_or(0)
        }

        /// Process state letter from /proc (`S` sleeping, `T` stopped, ...).
        fn proc_state(pid: u32) -> Option<char> {
            let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
            let after = &stat[stat.rfind(')')? + 1..];
            after.trim_start().chars().next()
        }

        fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
            let deadline = Instant::now() + Duration::from_secs(5);
            while Instant::now() < deadline {
                if cond() {
                    return true;
                }
                std::thread::sleep(Duration::from_millis(20));
            }
            false
        }

        #[test]
        fn process_pause_resume_stop() {
            let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            let dir = tempfile::tempdir().unwrap();
            let track = dir.path().join("lofi.wav");
            std::fs::write(&track, b"").unwrap();
            let script = fake_paplay(dir.path(), "exec sleep 30");
            let mut lofi = LofiPlayer::new(ProcessBackend::with_program(script), Some(track), 50);

            assert_eq!(lofi.play(), LofiState::Playing);
            let pid = lofi.backend().pid().unwrap();
            assert!(wait_for(|| runs(dir.path()) == 1));

            assert_eq!(lofi.pause(), LofiState::Paused);
            assert!(wait_for(|| proc_state(pid) == Some('T')));
            assert_eq!(lofi.refresh(), LofiState::Paused);

            assert_eq!(lofi.resume(), LofiState::Playing);
            assert!(wait_for(|| proc_state(pid).is_some_and(|s| s != 'T')));

            lofi.backend.stop();
            assert!(lofi.backend.is_finished());
            assert!(lofi.backend().pid().is_none());
            assert_eq!(proc_state(pid), None);
        }

        #[test]
        fn process_end_is_noticed_and_replayed() {
            let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            let dir = tempfile::tempdir().unwrap();
            let track = dir.path().join("lofi.wav");
            std::fs::write(&track, b"").unwrap();
            let script = fake_paplay(dir.path(), "exit 0");
            let mut lofi = LofiPlayer::new(ProcessBackend::with_program(script), Some(track), 50);

            assert_eq!(lofi.play(), LofiState::Playing);
            assert!(wait_for(|| lofi.refresh() == LofiState::Finished));

            assert_eq!(lofi.pause(), LofiState::Finished);
            assert_eq!(lofi.resume(), LofiState::Playing);
            assert!(wait_for(|| runs(dir.path()) == 2));

            // Stopping an exited player is quiet and leaves nothing behind.
            assert!(wait_for(|| lofi.backend.is_finished()));
            lofi.backend.stop();
            assert!(lofi.backend().pid().is_none());
        }
    }
}
