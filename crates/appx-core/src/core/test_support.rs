//! In-memory host used by the unit tests.
//!
//! Icons are kept as rendered TOML so every read and write goes through the
//! real codec.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use appx_domain::{parse_icon, render_icon, IconRecord, IconType, INFO_SUFFIX};

use crate::config::{Config, GlobalOptions, WriterVariant};
use crate::context::AppContext;
use crate::effects::{
    Clock, Desktop, Effects, EntryKind, FileSystem, HostFailure, IconCodec, ModifierProbe,
    Processes, Qualifiers, SharedEffects, WindowState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Put {
        path: PathBuf,
        kind: IconType,
        notify: bool,
    },
    Delete(PathBuf),
    Flush(PathBuf),
    Open(PathBuf),
    Query(PathBuf),
    Command(String),
    Spawn(PathBuf, Vec<String>),
    Chdir(PathBuf),
    ReadQualifiers,
}

struct HostState {
    writer: WriterVariant,
    entries: BTreeMap<PathBuf, EntryKind>,
    icons: BTreeMap<PathBuf, String>,
    put_calls: usize,
    failing_puts: BTreeSet<usize>,
    reject_puts: bool,
    busy_reads: u32,
    windows: VecDeque<WindowState>,
    window_default: WindowState,
    open_failure: Option<HostFailure>,
    command_failure: Option<HostFailure>,
    spawn_fails: bool,
    qualifiers: Option<Qualifiers>,
    program: Option<PathBuf>,
    cwd: PathBuf,
    started: Instant,
    elapsed: Duration,
    types_seen_while_open: Vec<Option<IconType>>,
    events: Vec<Event>,
}

pub(crate) struct FakeHost {
    state: Mutex<HostState>,
}

impl FakeHost {
    pub(crate) fn new() -> Arc<Self> {
        Self::with_writer(WriterVariant::Append)
    }

    pub(crate) fn with_writer(writer: WriterVariant) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(HostState {
                writer,
                entries: BTreeMap::new(),
                icons: BTreeMap::new(),
                put_calls: 0,
                failing_puts: BTreeSet::new(),
                reject_puts: false,
                busy_reads: 0,
                windows: VecDeque::new(),
                window_default: WindowState::Closed,
                open_failure: None,
                command_failure: None,
                spawn_fails: false,
                qualifiers: Some(Qualifiers::empty()),
                program: Some(PathBuf::from("/opt/appx/bin/appx")),
                cwd: PathBuf::from("/"),
                started: Instant::now(),
                elapsed: Duration::ZERO,
                types_seen_while_open: Vec::new(),
                events: Vec::new(),
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub(crate) fn context(self: &Arc<Self>, config: Config) -> AppContext {
        let config = config.with_writer(self.state().writer);
        let effects: SharedEffects = self.clone();
        AppContext::new(GlobalOptions::default(), config, effects)
    }

    pub(crate) fn add_dir(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut state = self.state();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            state
                .entries
                .entry(ancestor.to_path_buf())
                .or_insert(EntryKind::Directory);
        }
        state.entries.insert(path, EntryKind::Directory);
    }

    pub(crate) fn add_file(&self, path: impl Into<PathBuf>, executable: bool) {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.state()
            .entries
            .insert(path, EntryKind::File { executable });
    }

    /// Stores `icon` as `<target>.info`, bypassing the writer.
    pub(crate) fn set_icon(&self, target: impl AsRef<Path>, icon: &IconRecord) {
        let path = suffixed(target.as_ref());
        let text = render_icon(icon).expect("render fixture icon");
        self.state().icons.insert(path, text);
    }

    pub(crate) fn set_raw_icon(&self, target: impl AsRef<Path>, text: &str) {
        let path = suffixed(target.as_ref());
        self.state().icons.insert(path, text.to_string());
    }

    pub(crate) fn icon(&self, target: impl AsRef<Path>) -> Option<IconRecord> {
        let path = suffixed(target.as_ref());
        let state = self.state();
        state
            .icons
            .get(&path)
            .map(|text| parse_icon(text).expect("stored icon parses"))
    }

    pub(crate) fn icon_files(&self) -> Vec<PathBuf> {
        self.state().icons.keys().cloned().collect()
    }

    pub(crate) fn fail_put_call(&self, index: usize) {
        self.state().failing_puts.insert(index);
    }

    pub(crate) fn reject_all_puts(&self) {
        self.state().reject_puts = true;
    }

    pub(crate) fn hold_reads(&self, attempts: u32) {
        self.state().busy_reads = attempts;
    }

    pub(crate) fn script_windows(&self, states: impl IntoIterator<Item = WindowState>) {
        self.state().windows.extend(states);
    }

    pub(crate) fn keep_window_open(&self) {
        self.state().window_default = WindowState::Open;
    }

    pub(crate) fn fail_open(&self, failure: HostFailure) {
        self.state().open_failure = Some(failure);
    }

    pub(crate) fn fail_commands(&self, failure: HostFailure) {
        self.state().command_failure = Some(failure);
    }

    pub(crate) fn fail_spawns(&self) {
        self.state().spawn_fails = true;
    }

    pub(crate) fn set_qualifiers(&self, qualifiers: Option<Qualifiers>) {
        self.state().qualifiers = qualifiers;
    }

    pub(crate) fn set_program(&self, program: Option<PathBuf>) {
        self.state().program = program;
    }

    pub(crate) fn set_cwd(&self, path: impl Into<PathBuf>) {
        self.state().cwd = path.into();
    }

    pub(crate) fn cwd(&self) -> PathBuf {
        self.state().cwd.clone()
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.state().elapsed
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.state().events.clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.state().events.iter().filter(|event| pred(event)).count()
    }

    pub(crate) fn types_seen_while_open(&self) -> Vec<Option<IconType>> {
        self.state().types_seen_while_open.clone()
    }

    pub(crate) fn clear_events(&self) {
        self.state().events.clear();
    }
}

fn suffixed(path: &Path) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(INFO_SUFFIX);
    PathBuf::from(raw)
}

fn not_found(path: &Path) -> anyhow::Error {
    anyhow::Error::new(io::Error::from(io::ErrorKind::NotFound))
        .context(format!("{} does not exist", path.display()))
}

impl HostState {
    fn destination(&self, path: &Path) -> PathBuf {
        match self.writer {
            WriterVariant::Append => suffixed(path),
            WriterVariant::Literal => path.to_path_buf(),
        }
    }

    fn guard_literal(&self, dest: &Path) -> Result<()> {
        if self.writer == WriterVariant::Literal && self.entries.contains_key(dest) {
            bail!("refusing to replace {}: not an icon file", dest.display());
        }
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

impl IconCodec for FakeHost {
    fn get_icon(&self, target: &Path) -> Result<IconRecord> {
        let state = self.state();
        let path = suffixed(&state.resolve(target));
        let text = state.icons.get(&path).ok_or_else(|| not_found(&path))?;
        parse_icon(text).with_context(|| format!("failed to parse icon {}", path.display()))
    }

    fn put_icon(&self, path: &Path, icon: &IconRecord, notify: bool) -> Result<()> {
        let mut state = self.state();
        let call = state.put_calls;
        state.put_calls += 1;
        let dest = state.destination(&state.resolve(path));
        if state.reject_puts || state.failing_puts.contains(&call) {
            bail!("disk is write protected ({})", dest.display());
        }
        state.guard_literal(&dest)?;
        let text = render_icon(icon)?;
        state.icons.insert(dest.clone(), text);
        state.events.push(Event::Put {
            path: dest,
            kind: icon.kind,
            notify,
        });
        Ok(())
    }

    fn delete_icon(&self, path: &Path) -> Result<()> {
        let mut state = self.state();
        let dest = state.destination(&state.resolve(path));
        state.guard_literal(&dest)?;
        if state.icons.remove(&dest).is_none() {
            return Err(not_found(&dest));
        }
        state.events.push(Event::Delete(dest));
        Ok(())
    }

    fn open_for_read(&self, path: &Path) -> Result<()> {
        let mut state = self.state();
        if state.busy_reads > 0 {
            state.busy_reads -= 1;
            bail!("object in use: {}", path.display());
        }
        let path = state.resolve(path);
        match state.entries.get(&path) {
            Some(EntryKind::Directory) => bail!("{} is a directory", path.display()),
            Some(EntryKind::File { .. }) => Ok(()),
            None if state.icons.contains_key(&path) => Ok(()),
            None => Err(not_found(&path)),
        }
    }

    fn flush(&self, path: &Path) -> Result<()> {
        let mut state = self.state();
        let path = state.resolve(path);
        state.events.push(Event::Flush(path));
        Ok(())
    }
}

impl FileSystem for FakeHost {
    fn entry_kind(&self, path: &Path) -> Result<Option<EntryKind>> {
        let state = self.state();
        let path = state.resolve(path);
        if let Some(kind) = state.entries.get(&path) {
            return Ok(Some(*kind));
        }
        if state.icons.contains_key(&path) {
            return Ok(Some(EntryKind::File { executable: false }));
        }
        Ok(None)
    }

    fn current_dir(&self) -> Result<PathBuf> {
        Ok(self.state().cwd.clone())
    }

    fn set_current_dir(&self, path: &Path) -> Result<()> {
        let mut state = self.state();
        let path = state.resolve(path);
        if state.entries.get(&path) != Some(&EntryKind::Directory) {
            return Err(not_found(&path));
        }
        state.cwd = path.clone();
        state.events.push(Event::Chdir(path));
        Ok(())
    }

    fn absolute(&self, path: &Path) -> Result<PathBuf> {
        Ok(self.state().resolve(path))
    }
}

impl Desktop for FakeHost {
    fn open_object(&self, path: &Path) -> Result<(), HostFailure> {
        let mut state = self.state();
        state.events.push(Event::Open(path.to_path_buf()));
        match &state.open_failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }

    fn window_state(&self, path: &Path) -> WindowState {
        let mut state = self.state();
        state.events.push(Event::Query(path.to_path_buf()));
        let on_disk = state
            .icons
            .get(&suffixed(path))
            .and_then(|text| parse_icon(text).ok())
            .map(|icon| icon.kind);
        state.types_seen_while_open.push(on_disk);
        let fallback = state.window_default.clone();
        state.windows.pop_front().unwrap_or(fallback)
    }

    fn run_command(&self, command: &str) -> Result<(), HostFailure> {
        let mut state = self.state();
        state.events.push(Event::Command(command.to_string()));
        match &state.command_failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

impl Processes for FakeHost {
    fn spawn_detached(&self, program: &Path, args: &[String]) -> Result<()> {
        let mut state = self.state();
        if state.spawn_fails {
            return Err(anyhow!("fork failed for {}", program.display()));
        }
        state
            .events
            .push(Event::Spawn(program.to_path_buf(), args.to_vec()));
        Ok(())
    }

    fn program_path(&self) -> Option<PathBuf> {
        self.state().program.clone()
    }
}

impl ModifierProbe for FakeHost {
    fn qualifiers(&self) -> Option<Qualifiers> {
        let mut state = self.state();
        state.events.push(Event::ReadQualifiers);
        state.qualifiers
    }
}

impl Clock for FakeHost {
    fn now(&self) -> Instant {
        let state = self.state();
        state.started + state.elapsed
    }

    fn sleep(&self, duration: Duration) {
        self.state().elapsed += duration;
    }
}

impl Effects for FakeHost {
    fn icons(&self) -> &dyn IconCodec {
        self
    }

    fn fs(&self) -> &dyn FileSystem {
        self
    }

    fn desktop(&self) -> &dyn Desktop {
        self
    }

    fn processes(&self) -> &dyn Processes {
        self
    }

    fn input(&self) -> &dyn ModifierProbe {
        self
    }

    fn clock(&self) -> &dyn Clock {
        self
    }
}
