//! Application context
//!
//! [`AppContext`] is the composition root: it owns the grid controller (and
//! through it the storage) and the request generations for cells whose
//! contents arrive asynchronously. Handlers receive it by reference.
//!
//! The controller is only lent out immutably, so every commit passes
//! through here and supersedes pending updates for the cell it writes.

use slate_sheets_core::CellAddress;

use crate::controller::{ControllerOptions, Direction, GridController, Key};
use crate::error::StorageResult;
use crate::requests::{Acceptance, RequestGenerations, RequestTicket};
use crate::storage::Storage;

/// Everything a session needs, created once at startup
pub struct AppContext<S: Storage> {
    controller: GridController<S>,
    requests: RequestGenerations<CellAddress>,
}

impl<S: Storage> AppContext<S> {
    /// Open the saved grid from `storage`
    pub fn open(storage: S, options: &ControllerOptions) -> StorageResult<Self> {
        Ok(Self {
            controller: GridController::open(storage, options)?,
            requests: RequestGenerations::new(),
        })
    }

    pub fn controller(&self) -> &GridController<S> {
        &self.controller
    }

    /// Commit user input to a cell
    ///
    /// Pending asynchronous updates for the cell are superseded.
    pub fn commit(&mut self, addr: CellAddress, raw: &str) -> StorageResult<()> {
        self.requests.cancel(&addr);
        self.controller.commit_edit(addr, raw)
    }

    /// Forward a key to the controller
    ///
    /// A key that commits a cell supersedes pending updates for that cell.
    pub fn handle_key(&mut self, key: Key) -> StorageResult<()> {
        let committed = self.controller.handle_key(key)?;
        if let Some(addr) = committed {
            self.requests.cancel(&addr);
        }
        Ok(())
    }

    /// Remove every cell; all pending updates are superseded
    pub fn clear(&mut self) -> StorageResult<()> {
        self.requests.cancel_all();
        self.controller.clear()
    }

    pub fn select(&mut self, addr: CellAddress) {
        self.controller.select(addr);
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.controller.navigate(direction);
    }

    pub fn begin_edit(&mut self, addr: CellAddress) {
        self.controller.begin_edit(addr);
    }

    pub fn set_buffer<T: Into<String>>(&mut self, text: T) {
        self.controller.set_buffer(text);
    }

    pub fn cancel_edit(&mut self) {
        self.controller.cancel_edit();
    }

    /// Change the grid bounds
    pub fn resize(&mut self, rows: u32, cols: u16) -> slate_sheets_core::Result<()> {
        self.controller.resize(rows, cols)
    }

    /// Start an asynchronous update of a cell (e.g. a translation of its text)
    pub fn request_update(&mut self, addr: CellAddress) -> RequestTicket<CellAddress> {
        self.requests.issue(addr)
    }

    /// Deliver the result of an asynchronous update
    ///
    /// The result is committed only if no newer request or user edit for the
    /// same cell happened since the ticket was issued.
    pub fn complete_update(
        &mut self,
        ticket: &RequestTicket<CellAddress>,
        raw: &str,
    ) -> StorageResult<Acceptance> {
        let mut commit = None;
        let acceptance = self
            .requests
            .accept(ticket, raw, |raw| commit = Some(raw));

        if let Some(raw) = commit {
            self.controller.commit_edit(*ticket.field(), raw)?;
        }
        Ok(acceptance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    fn app() -> AppContext<MemoryStorage> {
        AppContext::open(MemoryStorage::new(), &ControllerOptions::default()).unwrap()
    }

    #[test]
    fn test_superseded_update_is_dropped() {
        let mut app = app();
        let a1 = addr("A1");

        let first = app.request_update(a1);
        let second = app.request_update(a1);

        assert_eq!(app.complete_update(&second, "hola").unwrap(), Acceptance::Accepted);
        assert_eq!(app.complete_update(&first, "bonjour").unwrap(), Acceptance::Stale);
        assert_eq!(app.controller().display_value(&a1), "hola");
    }

    #[test]
    fn test_user_edit_supersedes_pending_update() {
        let mut app = app();
        let a1 = addr("A1");

        let ticket = app.request_update(a1);
        app.commit(a1, "typed").unwrap();

        assert_eq!(app.complete_update(&ticket, "late").unwrap(), Acceptance::Stale);
        assert_eq!(app.controller().display_value(&a1), "typed");
    }

    #[test]
    fn test_typed_edit_supersedes_pending_update() {
        let mut app = app();
        let a1 = addr("A1");

        let ticket = app.request_update(a1);
        for ch in "typed".chars() {
            app.handle_key(Key::Char(ch)).unwrap();
        }
        app.handle_key(Key::Enter).unwrap();

        assert_eq!(app.complete_update(&ticket, "late").unwrap(), Acceptance::Stale);
        assert_eq!(app.controller().display_value(&a1), "typed");
    }

    #[test]
    fn test_delete_key_supersedes_pending_update() {
        let mut app = app();
        let b2 = addr("B2");
        app.commit(b2, "keep").unwrap();

        let ticket = app.request_update(b2);
        app.select(b2);
        app.handle_key(Key::Delete).unwrap();

        assert_eq!(app.complete_update(&ticket, "late").unwrap(), Acceptance::Stale);
        assert_eq!(app.controller().display_value(&b2), "");
    }

    #[test]
    fn test_navigation_keeps_pending_update() {
        let mut app = app();
        let a1 = addr("A1");

        let ticket = app.request_update(a1);
        app.handle_key(Key::Arrow(Direction::Down)).unwrap();
        app.handle_key(Key::Escape).unwrap();

        assert_eq!(app.complete_update(&ticket, "hola").unwrap(), Acceptance::Accepted);
        assert_eq!(app.controller().display_value(&a1), "hola");
    }

    #[test]
    fn test_clear_supersedes_every_pending_update() {
        let mut app = app();
        let first = app.request_update(addr("A1"));
        let second = app.request_update(addr("C4"));

        app.clear().unwrap();

        assert_eq!(app.complete_update(&first, "x").unwrap(), Acceptance::Stale);
        assert_eq!(app.complete_update(&second, "y").unwrap(), Acceptance::Stale);
        assert!(app.controller().grid().is_empty());
    }

    #[test]
    fn test_update_is_applied_once() {
        let mut app = app();
        let a1 = addr("A1");

        let ticket = app.request_update(a1);
        assert_eq!(app.complete_update(&ticket, "hola").unwrap(), Acceptance::Accepted);
        app.commit(a1, "typed later").unwrap();
        assert_eq!(app.complete_update(&ticket, "hola").unwrap(), Acceptance::Stale);
        assert_eq!(app.controller().display_value(&a1), "typed later");
    }
}
