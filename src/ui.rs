use std::cell::RefCell;

use anyhow::Result;
use colored::Colorize;

use util::Timer;

/// All interactions with the text UI should go through this struct.
pub struct Ui {
    /// -v setting, displays extra text info to user
    pub verbose: bool,
    /// -y setting, ignores all points where the user is prompted to enter 'y'
    override_confirmation: bool,
    /// keeps track of time for each phase
    timer: RefCell<Timer>,
    /// buffer to hold strings internally when getting input
    strbuf: RefCell<String>,
}

impl Ui {
    pub fn new(verbose: u8, yes: bool) -> Self {
        Self {
            verbose: verbose > 0,
            override_confirmation: yes,
            // Refcells so we can call confirm() and time phases w/o needing a unique reference:
            timer: RefCell::new(Timer::now()),
            strbuf: RefCell::new(String::with_capacity(16)),
        }
    }

    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.override_confirmation {
            return Ok(true);
        }
        eprintln!("{} (y/N)", prompt);

        let mut strbuf = self.strbuf.borrow_mut();

        strbuf.clear();
        std::io::stdin().read_line(&mut strbuf)?;
        match strbuf.chars().next() {
            Some('y') | Some('Y') => Ok(true),
            _ => Ok(false),
        }
    }

    pub fn start_timer(&self) {
        if self.verbose {
            self.timer.borrow_mut().reset();
        }
    }

    pub fn print_elapsed(&self, phase: &str) {
        if self.verbose {
            self.timer.borrow().print_elapsed(phase);
        }
    }

    pub fn verbose_msg(&self, msg: &str) {
        if self.verbose {
            eprintln!("{}", msg);
        }
    }

    pub fn verbose_progress(&self, msg: &str) {
        if self.verbose {
            eprint!("{}... ", msg.magenta());
        }
    }

    pub fn verbose_progress_debug<T: std::fmt::Debug>(&self, msg: &str, arg: T) {
        if self.verbose {
            eprint!("{} {:?}... ", msg.magenta(), arg);
        }
    }

    pub fn done(&self) {
        if self.verbose {
            eprintln!("{}.", "done".green());
        }
    }
}
