//! Frame Host
//!
//! Browser-side handle for one frame. Callers may use it from any thread;
//! dispatch-style calls are reposted to the owner thread, where each
//! operation is run against the live remote frame, queued until the remote
//! side attaches, or dropped, depending on the lifecycle.

use crate::browser::{
    Browser, DraggableRegion, FocusSource, OpenUrlParams, PageTransition, StringVisitor,
    WindowOpenDisposition,
};
use crate::error::FrameError;
use crate::frame::binder::RemoteEndpointBinder;
use crate::frame::id::{effective_id, FrameId};
use crate::frame::queue::FrameAction;
use crate::frame::state::{Endpoint, FrameState, Lifecycle};
use crate::message::{ProcessId, ProcessMessage};
use crate::remote::{
    record_frame_id, Referrer, RemoteFrame, RemoteFrameRecord, RequestParams, SharedText,
    TextCallback,
};
use crate::runner::TaskRunner;
use crate::url_util;
use parking_lot::Mutex;
use serde_json::Value;
use std::convert::Infallible;
use std::sync::{Arc, Weak};
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

pub struct FrameHost {
    is_main_frame: bool,
    runner: TaskRunner,
    state: Mutex<FrameState>,
}

impl FrameHost {
    /// Create a placeholder handle with no remote record.
    ///
    /// The main frame has no parent (`FrameId::INVALID`); any other frame
    /// must name a real parent.
    pub fn new(
        session: Weak<dyn Browser>,
        runner: TaskRunner,
        is_main_frame: bool,
        parent_frame_id: FrameId,
    ) -> Arc<Self> {
        if is_main_frame {
            debug_assert_eq!(parent_frame_id, FrameId::INVALID);
        } else {
            debug_assert!(parent_frame_id.as_i64() >= 0);
        }

        Arc::new(Self {
            is_main_frame,
            runner,
            state: Mutex::new(FrameState::new(session, is_main_frame, parent_frame_id)),
        })
    }

    /// Create a handle bound to `record`. Main-ness and the parent id come
    /// from the record's parent link.
    pub fn with_record(
        session: Weak<dyn Browser>,
        runner: TaskRunner,
        record: Arc<dyn RemoteFrameRecord>,
    ) -> Result<Arc<Self>, FrameError> {
        if !runner.runs_tasks_on_current_thread() {
            return Err(FrameError::WrongThread {
                operation: "with_record",
            });
        }

        let parent = record.parent();
        let is_main_frame = parent.is_none();
        let parent_frame_id = parent
            .map(|parent| record_frame_id(parent.as_ref()))
            .unwrap_or(FrameId::INVALID);

        let host = Arc::new(Self {
            is_main_frame,
            runner,
            state: Mutex::new(FrameState::new(session, is_main_frame, parent_frame_id)),
        });
        host.bind(record)?;
        Ok(host)
    }

    // ----- Lifecycle -----

    /// Bind a new remote record, replacing any previous one.
    ///
    /// Drops the cached connection and re-reads ids and attributes from the
    /// record. Queued actions and the attached state are left alone.
    pub fn bind(&self, record: Arc<dyn RemoteFrameRecord>) -> Result<(), FrameError> {
        self.require_owner_thread("bind")?;

        let frame_id = record_frame_id(record.as_ref());
        let url = record.last_committed_url();
        let name = record.frame_name();
        let parent_frame_id = self.parent_id_from(record.as_ref());

        let mut state = self.state.lock();
        let next = match state.endpoint {
            Endpoint::Detached => return Err(FrameError::Detached),
            Endpoint::Attached(_) => Endpoint::Attached(record),
            Endpoint::Unbound | Endpoint::Bound(_) => Endpoint::Bound(record),
        };
        state.endpoint = next;
        state.binder.reset();
        state.frame_id = frame_id;
        state.url = url;
        state.name = name;
        if let Some(parent_frame_id) = parent_frame_id {
            state.parent_frame_id = parent_frame_id;
        }

        debug!(
            frame_id = %frame_id,
            lifecycle = ?state.endpoint.lifecycle(),
            "Bound remote frame record"
        );
        Ok(())
    }

    /// The remote frame signalled readiness: run everything queued, in order.
    ///
    /// Only the first call transitions; later calls and calls on a detached
    /// handle do nothing. Queued actions are run one at a time, and draining
    /// stops as soon as an action detaches the frame or binds another record.
    pub fn attach(&self) -> Result<(), FrameError> {
        self.require_owner_thread("attach")?;

        let (frame_id, record) = {
            let mut state = self.state.lock();
            let record = match &state.endpoint {
                Endpoint::Bound(record) => Arc::clone(record),
                Endpoint::Attached(_) | Endpoint::Detached => return Ok(()),
                Endpoint::Unbound => {
                    return Err(FrameError::IllegalTransition {
                        from: Lifecycle::Unbound,
                        event: "attach",
                    })
                }
            };
            state.endpoint = Endpoint::Attached(Arc::clone(&record));
            (state.frame_id, record)
        };

        let Some(remote) = self.connection_for(&record) else {
            let discarded = {
                let mut state = self.state.lock();
                if state.is_attached_to(&record) {
                    state.queue.take()
                } else {
                    Default::default()
                }
            };
            debug!(
                frame_id = %frame_id,
                discarded = discarded.len(),
                "Attached without a reachable remote frame; discarding queued actions"
            );
            return Ok(());
        };

        debug!(frame_id = %frame_id, "Attached; draining queued actions");
        let mut drained = 0usize;
        loop {
            // Re-checked per action: a drained action may detach or rebind.
            let next = {
                let mut state = self.state.lock();
                if state.is_attached_to(&record) {
                    Ok(state.queue.pop())
                } else {
                    Err((state.endpoint.lifecycle(), state.queue.take()))
                }
            };
            match next {
                Ok(Some(action)) => {
                    action(remote.as_ref());
                    drained += 1;
                }
                Ok(None) => break,
                Err((lifecycle, discarded)) => {
                    debug!(
                        frame_id = %frame_id,
                        drained,
                        discarded = discarded.len(),
                        lifecycle = ?lifecycle,
                        "Frame changed while draining; discarding remaining actions"
                    );
                    break;
                }
            }
        }
        Ok(())
    }

    /// Permanently tear the handle down.
    ///
    /// Queued actions are discarded unexecuted. Calling it again is a no-op.
    pub fn detach(&self) -> Result<(), FrameError> {
        self.require_owner_thread("detach")?;

        let discarded = {
            let mut state = self.state.lock();
            if state.session.is_none() {
                return Ok(());
            }
            state.session = None;
            state.endpoint = Endpoint::Detached;
            state.binder.reset();
            state.frame_id = FrameId::INVALID;
            state.queue.take()
        };

        debug!(
            is_main = self.is_main_frame,
            discarded = discarded.len(),
            "Detached frame"
        );
        Ok(())
    }

    /// Re-read address, name and parent from the bound record.
    pub fn refresh_attributes(&self) -> Result<(), FrameError> {
        self.require_owner_thread("refresh_attributes")?;

        let Some(record) = self.record() else {
            return Ok(());
        };

        let url = record.last_committed_url();
        // An empty assigned name falls back to the frame tree's unique name.
        let mut name = record.frame_name();
        if name.is_empty() {
            if let Some(unique) = self
                .browser()
                .and_then(|browser| browser.unique_name(record.frame_tree_node_id()))
            {
                name = unique;
            }
        }
        let parent_frame_id = self.parent_id_from(record.as_ref());

        let mut state = self.state.lock();
        state.url = url;
        state.name = name;
        if let Some(parent_frame_id) = parent_frame_id {
            state.parent_frame_id = parent_frame_id;
        }
        Ok(())
    }

    // ----- Dispatch -----

    /// Route `action` to the remote frame.
    ///
    /// Off the owner thread the call is reposted. On it, the action is
    /// dropped while unbound or detached, queued while bound, and run
    /// immediately once attached. Nothing is reported back to the caller.
    pub fn dispatch(self: &Arc<Self>, action: FrameAction) {
        if !self.runner.runs_tasks_on_current_thread() {
            self.repost(move |this| this.dispatch(action));
            return;
        }

        let (frame_id, record) = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            match &state.endpoint {
                Endpoint::Unbound | Endpoint::Detached => {
                    // Placeholder without a remote representation, or torn down.
                    trace!(
                        frame_id = %state.frame_id,
                        lifecycle = ?state.endpoint.lifecycle(),
                        "Dropping action"
                    );
                    return;
                }
                Endpoint::Bound(_) => {
                    state.queue.push(action);
                    trace!(
                        frame_id = %state.frame_id,
                        pending = state.queue.len(),
                        "Queued action until attach"
                    );
                    return;
                }
                Endpoint::Attached(_) if !state.queue.is_empty() => {
                    // Attach is still draining; keep behind what it has left.
                    state.queue.push(action);
                    return;
                }
                Endpoint::Attached(record) => (state.frame_id, Arc::clone(record)),
            }
        };

        match self.connection_for(&record) {
            Some(remote) => {
                trace!(frame_id = %frame_id, "Running action");
                action(remote.as_ref());
            }
            None => debug!(frame_id = %frame_id, "Remote frame unreachable; dropping action"),
        }
    }

    /// Cached connection for `record`, connecting without the lock held.
    ///
    /// `None` when the record cannot connect or is no longer the one bound.
    fn connection_for(
        &self,
        record: &Arc<dyn RemoteFrameRecord>,
    ) -> Option<Arc<dyn RemoteFrame>> {
        {
            let state = self.state.lock();
            if !state.is_bound_to(record) {
                return None;
            }
            if let Some(connection) = state.binder.cached() {
                return Some(connection);
            }
        }

        let connection = RemoteEndpointBinder::connect(record.as_ref())?;

        let mut state = self.state.lock();
        if !state.is_bound_to(record) {
            trace!(frame_id = %state.frame_id, "Record replaced while connecting");
            return None;
        }
        Some(state.binder.store(connection))
    }

    fn send_command(self: &Arc<Self>, command: &'static str) {
        self.dispatch(Box::new(move |remote: &dyn RemoteFrame| {
            remote.send_command(command)
        }));
    }

    fn send_command_with_response(self: &Arc<Self>, command: &'static str, callback: TextCallback) {
        self.dispatch(Box::new(move |remote: &dyn RemoteFrame| {
            remote.send_command_with_response(command, callback)
        }));
    }

    fn repost<F>(self: &Arc<Self>, call: F)
    where
        F: FnOnce(Arc<FrameHost>) + Send + 'static,
    {
        let this = Arc::clone(self);
        if !self.runner.post(move || call(this)) {
            debug!("Owner thread gone; dropping frame call");
        }
    }

    // ----- Editing commands -----

    pub fn undo(self: &Arc<Self>) {
        self.send_command("Undo");
    }

    pub fn redo(self: &Arc<Self>) {
        self.send_command("Redo");
    }

    pub fn cut(self: &Arc<Self>) {
        self.send_command("Cut");
    }

    pub fn copy(self: &Arc<Self>) {
        self.send_command("Copy");
    }

    pub fn paste(self: &Arc<Self>) {
        self.send_command("Paste");
    }

    pub fn delete(self: &Arc<Self>) {
        self.send_command("Delete");
    }

    pub fn select_all(self: &Arc<Self>) {
        self.send_command("SelectAll");
    }

    // ----- Source and text retrieval -----

    /// Show the frame's source through the browser's text view.
    pub fn view_source(self: &Arc<Self>) {
        let frame = Arc::clone(self);
        self.send_command_with_response(
            "GetSource",
            Box::new(move |response: SharedText| {
                if let Some(browser) = frame.browser() {
                    browser.view_text(response.decode());
                }
            }),
        );
    }

    /// Deliver the frame's source to `visitor`, on whichever thread the
    /// response arrives.
    pub fn get_source(self: &Arc<Self>, visitor: Arc<dyn StringVisitor>) {
        self.send_command_with_response("GetSource", visit_callback(visitor));
    }

    /// Deliver the frame's plain text to `visitor`.
    pub fn get_text(self: &Arc<Self>, visitor: Arc<dyn StringVisitor>) {
        self.send_command_with_response("GetText", visit_callback(visitor));
    }

    /// Like [`FrameHost::get_source`], resolving a oneshot instead.
    ///
    /// The receiver errors if the request is dropped before a response.
    pub fn fetch_source(self: &Arc<Self>) -> oneshot::Receiver<String> {
        self.fetch_response("GetSource")
    }

    pub fn fetch_text(self: &Arc<Self>) -> oneshot::Receiver<String> {
        self.fetch_response("GetText")
    }

    fn fetch_response(self: &Arc<Self>, command: &'static str) -> oneshot::Receiver<String> {
        let (tx, rx) = oneshot::channel();
        self.send_command_with_response(
            command,
            Box::new(move |response: SharedText| {
                let _ = tx.send(response.decode());
            }),
        );
        rx
    }

    // ----- Navigation -----

    /// Navigate this frame. Unusable addresses are dropped.
    pub fn load_request(self: &Arc<Self>, mut params: RequestParams) {
        let Some(url) = url_util::fixup_url(&params.url) else {
            debug!(url = %params.url, "Dropping load of unusable address");
            return;
        };
        params.url = url.into();

        self.dispatch(Box::new(move |remote: &dyn RemoteFrame| {
            remote.load_request(params)
        }));

        if let Some(browser) = self.browser() {
            browser.on_set_focus(FocusSource::Navigation);
        }
    }

    pub fn load_url(self: &Arc<Self>, url: &str) {
        self.load_url_with_extras(url, None, PageTransition::EXPLICIT, "");
    }

    /// Navigate with an explicit referrer, transition and extra headers.
    ///
    /// The main frame navigates through the browser; other frames through a
    /// request to the remote frame. Handles without a resolved id do nothing.
    pub fn load_url_with_extras(
        self: &Arc<Self>,
        url: &str,
        referrer: Option<Referrer>,
        transition: PageTransition,
        extra_headers: &str,
    ) {
        let frame_id = self.identifier();
        if frame_id < FrameId::MAIN {
            return;
        }

        // Fixup, if any, happens in load_request.
        let url = url_util::make_url(url, false)
            .map(String::from)
            .unwrap_or_else(|| url.trim().to_string());

        if frame_id == FrameId::MAIN {
            if let Some(browser) = self.browser() {
                browser.load_main_frame_url(OpenUrlParams {
                    url,
                    referrer,
                    disposition: WindowOpenDisposition::CurrentTab,
                    transition,
                    is_renderer_initiated: false,
                    extra_headers: extra_headers.to_string(),
                });
            }
        } else {
            self.load_request(RequestParams {
                url,
                method: "GET".to_string(),
                referrer,
                headers: extra_headers.to_string(),
            });
        }
    }

    // ----- Script and messages -----

    pub fn execute_javascript(self: &Arc<Self>, code: &str, script_url: &str, start_line: i32) {
        if code.is_empty() {
            return;
        }
        // Line 0 means "no line info" downstream and is rejected there.
        let start_line = start_line.max(1);
        let code = code.to_string();
        let script_url = script_url.to_string();

        self.dispatch(Box::new(move |remote: &dyn RemoteFrame| {
            remote.send_javascript(&code, &script_url, start_line)
        }));
    }

    /// Run script directly through the bound record with a user gesture.
    /// Bypasses the action queue.
    pub fn execute_javascript_with_user_gesture_for_tests(self: &Arc<Self>, code: &str) {
        if !self.runner.runs_tasks_on_current_thread() {
            let code = code.to_string();
            self.repost(move |this| this.execute_javascript_with_user_gesture_for_tests(&code));
            return;
        }

        if let Some(record) = self.record() {
            record.execute_javascript_with_user_gesture_for_tests(code);
        }
    }

    /// Send `message` to the renderer. Its argument list is taken when the
    /// send actually happens; a dropped send leaves the message untouched.
    pub fn send_process_message(self: &Arc<Self>, target: ProcessId, message: Arc<ProcessMessage>) {
        if target != ProcessId::Renderer {
            warn!(destination = ?target, name = message.name(), "Frames only send to the renderer");
            return;
        }
        if !message.is_valid() {
            return;
        }

        self.dispatch(Box::new(move |remote: &dyn RemoteFrame| {
            if let Some(arguments) = message.take_argument_list() {
                remote.send_message(message.name(), arguments);
            }
        }));
    }

    /// Deliver a message from the renderer to the client's observer.
    pub fn receive_message(self: &Arc<Self>, name: &str, arguments: Vec<Value>) {
        let Some(browser) = self.browser() else {
            return;
        };
        let Some(client) = browser.client() else {
            return;
        };

        let message = ProcessMessage::read_only_view(name, arguments);
        client.on_process_message_received(&browser, self, ProcessId::Renderer, &message);
        message.detach();
    }

    // ----- Notifications -----

    pub fn notify_move_or_resize_started(self: &Arc<Self>) {
        self.dispatch(Box::new(|remote: &dyn RemoteFrame| {
            remote.move_or_resize_started()
        }));
    }

    /// Tell the remote frame loading stopped, unless its parent lives in the
    /// same process and will notify for both.
    pub fn maybe_send_did_stop_loading(self: &Arc<Self>) {
        if !self.runner.runs_tasks_on_current_thread() {
            self.repost(|this| this.maybe_send_did_stop_loading());
            return;
        }

        let Some(record) = self.record() else {
            return;
        };
        if let Some(parent) = record.parent() {
            if parent.process_id() == record.process_id() {
                trace!(process_id = record.process_id(), "Parent shares process; skipping stop notification");
                return;
            }
        }

        self.dispatch(Box::new(|remote: &dyn RemoteFrame| remote.did_stop_loading()));
    }

    pub fn did_finish_frame_load(self: &Arc<Self>, url: &str, http_status_code: i32) {
        if let Some(browser) = self.browser() {
            browser.on_did_finish_load(self, url, http_status_code);
        }
    }

    /// Forward draggable regions to the client's drag handler. `None` clears them.
    pub fn update_draggable_regions(self: &Arc<Self>, regions: Option<Vec<DraggableRegion>>) {
        let Some(browser) = self.browser() else {
            return;
        };
        let Some(handler) = browser.client().and_then(|client| client.drag_handler()) else {
            return;
        };

        let regions = regions.unwrap_or_default();
        handler.on_draggable_regions_changed(&browser, self, &regions);
    }

    // ----- Accessors -----

    /// True until detached and while the owning browser is alive.
    pub fn is_valid(&self) -> bool {
        self.browser().is_some()
    }

    pub fn is_main(&self) -> bool {
        self.is_main_frame
    }

    pub fn is_focused(&self) -> bool {
        self.state.lock().is_focused
    }

    pub fn set_focused(&self, focused: bool) {
        self.state.lock().is_focused = focused;
    }

    pub fn name(&self) -> String {
        self.state.lock().name.clone()
    }

    pub fn url(&self) -> String {
        self.state.lock().url.clone()
    }

    /// Externally visible id; always [`FrameId::MAIN`] for the main frame.
    pub fn identifier(&self) -> FrameId {
        effective_id(self.is_main_frame, self.state.lock().frame_id)
    }

    pub fn parent_identifier(&self) -> Option<FrameId> {
        let state = self.state.lock();
        if self.is_main_frame || state.parent_frame_id == FrameId::INVALID {
            return None;
        }
        Some(state.parent_frame_id)
    }

    /// Parent frame, looked up through the owning browser.
    pub fn parent(&self) -> Option<Arc<FrameHost>> {
        let parent_frame_id = self.parent_identifier()?;
        self.browser()?.frame(parent_frame_id)
    }

    pub fn browser(&self) -> Option<Arc<dyn Browser>> {
        self.state.lock().browser()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state.lock().endpoint.lifecycle()
    }

    /// Number of actions waiting for attach.
    pub fn pending_actions(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Script contexts only exist in the renderer process.
    pub fn v8_context(&self) -> Result<Infallible, FrameError> {
        Err(FrameError::Unsupported(
            "v8_context cannot be called from the browser process",
        ))
    }

    /// DOM traversal only exists in the renderer process.
    pub fn visit_dom(&self) -> Result<(), FrameError> {
        Err(FrameError::Unsupported(
            "visit_dom cannot be called from the browser process",
        ))
    }

    fn record(&self) -> Option<Arc<dyn RemoteFrameRecord>> {
        self.state.lock().endpoint.record().cloned()
    }

    fn parent_id_from(&self, record: &dyn RemoteFrameRecord) -> Option<FrameId> {
        if self.is_main_frame {
            return None;
        }
        record
            .parent()
            .map(|parent| record_frame_id(parent.as_ref()))
    }

    fn require_owner_thread(&self, operation: &'static str) -> Result<(), FrameError> {
        if self.runner.runs_tasks_on_current_thread() {
            Ok(())
        } else {
            Err(FrameError::WrongThread { operation })
        }
    }
}

impl std::fmt::Debug for FrameHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("FrameHost")
            .field("is_main", &self.is_main_frame)
            .field("frame_id", &state.frame_id)
            .field("lifecycle", &state.endpoint.lifecycle())
            .field("pending", &state.queue.len())
            .finish()
    }
}

fn visit_callback(visitor: Arc<dyn StringVisitor>) -> TextCallback {
    Box::new(move |response: SharedText| visitor.visit(&response.decode()))
}
