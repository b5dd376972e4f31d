use std::io::Write;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Stopwatch {
    start: Option<Instant>,
    elapsed: Duration,
    children: Stopwatches,
}

impl Stopwatch {
    fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    fn stop(&mut self) {
        if let Some(instant) = self.start.take() {
            self.elapsed += instant.elapsed();
        }
    }

    // bank the running time but leave the watch marked active
    fn suspend(&mut self) {
        if let Some(instant) = self.start {
            self.elapsed += instant.elapsed();
            self.children.suspend();
        }
    }

    fn resume(&mut self) {
        if self.start.is_some() {
            self.start = Some(Instant::now());
            self.children.resume();
        }
    }
}

// Insertion ordered so that reports list timers in the order
// they were first started
#[derive(Debug, Default)]
struct Stopwatches(Vec<(&'static str, Stopwatch)>);

impl Stopwatches {
    fn entry(&mut self, key: &'static str) -> &mut Stopwatch {
        let pos = match self.0.iter().position(|(k, _)| *k == key) {
            Some(pos) => pos,
            None => {
                self.0.push((key, Stopwatch::default()));
                self.0.len() - 1
            }
        };
        &mut self.0[pos].1
    }

    fn get(&self, key: &str) -> Option<&Stopwatch> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, t)| t)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Stopwatch> {
        self.0.iter_mut().find(|(k, _)| *k == key).map(|(_, t)| t)
    }

    fn suspend(&mut self) {
        self.0.iter_mut().for_each(|(_, t)| t.suspend());
    }

    fn resume(&mut self) {
        self.0.iter_mut().for_each(|(_, t)| t.resume());
    }

    fn total_time(&self) -> Duration {
        self.0.iter().map(|(_, t)| t.elapsed).sum()
    }

    fn write_report(&self, out: &mut dyn Write, depth: usize) -> std::io::Result<()> {
        for (key, t) in self.0.iter() {
            writeln!(out, "{:indent$}{} : {:?}", "", key, t.elapsed, indent = 4 * depth)?;
            t.children.write_report(out, depth + 1)?;
        }
        Ok(())
    }
}

/// A tree of named stopwatches.
///
/// Starting a timer while another is running nests the new one beneath
/// it, so that `"solve"` can be broken down into `"phase one"` and
/// `"phase two"` and so on.
#[derive(Default, Debug)]
pub struct Timers {
    stack: Vec<&'static str>,
    root: Stopwatches,
}

impl Timers {
    fn active_mut(&mut self) -> Option<&mut Stopwatch> {
        let (first, rest) = self.stack.split_first()?;
        let mut active = self.root.get_mut(first)?;
        for key in rest {
            active = active.children.get_mut(key)?;
        }
        Some(active)
    }

    /// Clears every timer
    pub fn reset(&mut self) {
        self.stack.clear();
        self.root = Stopwatches::default();
    }

    /// Clears the top level timer `key` and everything beneath it
    pub fn reset_timer(&mut self, key: &'static str) {
        self.root.0.retain(|(k, _)| *k != key);
    }

    /// Starts the timer `key` as a child of the current timer
    pub fn start_as_current(&mut self, key: &'static str) {
        match self.active_mut() {
            Some(active) => active.children.entry(key).start(),
            None => self.root.entry(key).start(),
        }
        self.stack.push(key);
    }

    /// Stops the current timer and makes its parent current
    pub fn stop_current(&mut self) {
        if let Some(active) = self.active_mut() {
            active.stop();
        }
        self.stack.pop();
    }

    /// Suspend every timer in the collection.  Used for notimeit!
    pub fn suspend(&mut self) {
        self.root.suspend();
    }

    /// Resume every timer in the collection.  Used for notimeit!
    pub fn resume(&mut self) {
        self.root.resume();
    }

    /// Sum of the top level timers
    pub fn total_time(&self) -> Duration {
        self.root.total_time()
    }

    /// Time recorded by the timer at `path`, e.g. `&["solve", "phase one"]`.
    /// Timers that never ran report zero.
    pub fn elapsed(&self, path: &[&str]) -> Duration {
        let Some((first, rest)) = path.split_first() else {
            return Duration::ZERO;
        };
        let mut t = match self.root.get(first) {
            Some(t) => t,
            None => return Duration::ZERO,
        };
        for key in rest {
            t = match t.children.get(key) {
                Some(child) => child,
                None => return Duration::ZERO,
            };
        }
        t.elapsed
    }

    /// Writes an indented breakdown of every timer
    pub fn write_report(&self, out: &mut dyn Write) -> std::io::Result<()> {
        self.root.write_report(out, 0)
    }
}

macro_rules! timeit {
    ($timer:ident => $key:literal; $($tt:tt)+) => {

        $timer.start_as_current($key);
        $(
            $tt
        )+
        $timer.stop_current();
    }
}
pub(crate) use timeit;

macro_rules! notimeit {
    ($timer:ident; $($tt:tt)+) => {

        $timer.suspend();
        $(
            $tt
        )+
        $timer.resume();
    }
}
pub(crate) use notimeit;

#[test]
fn test_timers_nesting() {
    let mut timers = Timers::default();
    timers.start_as_current("solve");
    timers.start_as_current("phase one");
    std::thread::sleep(Duration::from_millis(2));
    timers.stop_current();
    timers.start_as_current("phase two");
    timers.stop_current();
    timers.stop_current();

    let one = timers.elapsed(&["solve", "phase one"]);
    let solve = timers.elapsed(&["solve"]);
    assert!(one >= Duration::from_millis(2));
    assert!(solve >= one);
    assert_eq!(timers.total_time(), solve);
    assert_eq!(timers.elapsed(&["solve", "missing"]), Duration::ZERO);

    let mut buf = Vec::new();
    timers.write_report(&mut buf).unwrap();
    let report = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("solve"));
    assert!(lines[1].starts_with("    phase one"));
    assert!(lines[2].starts_with("    phase two"));

    timers.start_as_current("setup");
    timers.stop_current();
    timers.reset_timer("solve");
    assert_eq!(timers.elapsed(&["solve"]), Duration::ZERO);
    assert!(timers.write_report(&mut std::io::sink()).is_ok());

    timers.reset();
    assert_eq!(timers.total_time(), Duration::ZERO);
}

#[test]
fn test_timers_suspend() {
    let mut timers = Timers::default();
    timers.start_as_current("solve");
    timers.suspend();
    std::thread::sleep(Duration::from_millis(20));
    timers.resume();
    timers.stop_current();
    assert!(timers.elapsed(&["solve"]) < Duration::from_millis(20));
}
