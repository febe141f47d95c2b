use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use anyhow::{Result, anyhow};
use log::debug;

use crate::events::ProcessEventsPage;
use crate::session::{Direction, SessionTree};

pub type PageSender = Sender<(ProcessEventsPage, Direction)>;

/// Handle on a worker thread that owns a [`SessionTree`] and merges the pages
/// it receives strictly in arrival order.
pub struct PageFeed {
    sender: PageSender,
    worker: JoinHandle<SessionTree>,
}

pub fn spawn_merger(mut session: SessionTree) -> PageFeed {
    let (sender, receiver) = mpsc::channel::<(ProcessEventsPage, Direction)>();

    let worker = std::thread::spawn(move || {
        for (page, direction) in receiver {
            if !session.merge_page(&page, direction) {
                debug!("Dropped duplicate delivery of page {}", page.cursor);
            }
        }
        session
    });

    PageFeed { sender, worker }
}

impl PageFeed {
    /// A sender for another producer thread
    pub fn sender(&self) -> PageSender {
        self.sender.clone()
    }

    pub fn send(&self, page: ProcessEventsPage, direction: Direction) -> Result<()> {
        self.sender
            .send((page, direction))
            .map_err(|_| anyhow!("The page merger has stopped"))
    }

    /// Wait for every queued page to be merged and return the session.
    ///
    /// Senders obtained through [`PageFeed::sender`] must be dropped first,
    /// otherwise this waits for them.
    pub fn finish(self) -> Result<SessionTree> {
        drop(self.sender);
        self.worker
            .join()
            .map_err(|_| anyhow!("The page merger thread panicked"))
    }
}
