/// Screen state machine and event loop for the terminal client
///
/// The loop mirrors the usual poll-driven shape: drain engine events and
/// async results, tick once a second, draw, then poll the keyboard. Backend
/// calls are spawned onto the runtime and report back over an mpsc channel so
/// the UI never blocks on a simulated delay.
use crate::backend::{AuthSource, ConversationSource, Credentials, MockBackend, SignUpForm};
use crate::config::Config;
use crate::conversation::ConversationList;
use crate::engine::{reply_ref, ChatEngine};
use crate::otp::{OtpEntry, OtpStatus};
use crate::session::SessionStore;
use crate::thread::MessageThread;
use crate::types::{ChatEvent, Conversation, Message, MessageDirection, User};
use crate::ui::form::TextField;
use crate::validate::{self, FieldError};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Frame, Terminal};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SignIn,
    SignUp,
    ForgotPassword,
    VerifyOtp,
    ResetPassword,
    Chat,
}

/// Where a successful OTP verification leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyNext {
    SignIn,
    ResetPassword,
}

/// Results of spawned backend calls, delivered back to the UI loop
enum UiMsg {
    SignedIn(crate::Result<User>),
    SignedUp(crate::Result<User>),
    ResetRequested(crate::Result<()>),
    CodeVerified(crate::Result<bool>),
    ConversationsLoaded(crate::Result<Vec<Conversation>>),
    MessagesLoaded {
        conversation_id: String,
        result: crate::Result<Vec<Message>>,
    },
}

pub struct FormState {
    pub fields: Vec<TextField>,
    pub focus: usize,
    pub errors: Vec<FieldError>,
    pub busy: bool,
}

impl FormState {
    fn new(fields: Vec<TextField>) -> Self {
        Self {
            fields,
            focus: 0,
            errors: Vec::new(),
            busy: false,
        }
    }

    fn sign_in() -> Self {
        Self::new(vec![
            TextField::new("Email", "email"),
            TextField::masked("Password", "password"),
        ])
    }

    fn sign_up() -> Self {
        Self::new(vec![
            TextField::new("Name", "name"),
            TextField::new("Email", "email"),
            TextField::masked("Password", "password"),
            TextField::masked("Confirm password", "confirmPassword"),
        ])
    }

    fn forgot() -> Self {
        Self::new(vec![TextField::new("Email", "email")])
    }

    fn reset() -> Self {
        Self::new(vec![
            TextField::masked("New password", "password"),
            TextField::masked("Confirm password", "confirmPassword"),
        ])
    }

    pub(crate) fn value(&self, field: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.field() == field)
            .map(|f| f.value())
            .unwrap_or("")
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }
}

pub struct VerifyState {
    pub otp: OtpEntry,
    pub next: VerifyNext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatFocus {
    Sidebar,
    Composer,
    Search,
}

pub struct ChatState {
    pub list: ConversationList,
    pub thread: MessageThread,
    pub composer: String,
    pub search_input: String,
    pub focus: ChatFocus,
    pub cursor: usize,
    pub loading_list: bool,
    pub loading_thread: bool,
}

impl ChatState {
    fn new() -> Self {
        Self {
            list: ConversationList::new(Vec::new()),
            thread: MessageThread::new(),
            composer: String::new(),
            search_input: String::new(),
            focus: ChatFocus::Sidebar,
            cursor: 0,
            loading_list: false,
            loading_thread: false,
        }
    }
}

pub struct StatusLine {
    pub text: String,
    pub error: bool,
    shown_at: Instant,
}

pub struct App {
    config: Config,
    backend: MockBackend,
    engine: ChatEngine,
    session: SessionStore,
    events: broadcast::Receiver<ChatEvent>,
    msg_tx: mpsc::UnboundedSender<UiMsg>,
    msg_rx: mpsc::UnboundedReceiver<UiMsg>,
    pub screen: Screen,
    pub user: Option<User>,
    pub sign_in: FormState,
    pub sign_up: FormState,
    pub forgot: FormState,
    pub forgot_sent: bool,
    pub reset: FormState,
    pub verify: VerifyState,
    pub chat: ChatState,
    pub status: Option<StatusLine>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> crate::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let session = SessionStore::new(&config.data_dir)?;
        let backend = MockBackend::new();
        let engine = ChatEngine::new(&config);
        let events = engine.subscribe();
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        let user = session.load()?;
        let otp_cooldown = config.otp_resend_secs;

        let mut app = Self {
            config,
            backend,
            engine,
            session,
            events,
            msg_tx,
            msg_rx,
            screen: Screen::SignIn,
            user,
            sign_in: FormState::sign_in(),
            sign_up: FormState::sign_up(),
            forgot: FormState::forgot(),
            forgot_sent: false,
            reset: FormState::reset(),
            verify: VerifyState {
                otp: OtpEntry::new(otp_cooldown),
                next: VerifyNext::SignIn,
            },
            chat: ChatState::new(),
            status: None,
            should_quit: false,
        };

        if let Some(user) = &app.user {
            info!(email = %user.email, "restored session");
            app.enter_chat();
        }
        Ok(app)
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut last_tick = Instant::now();
        loop {
            // Drain engine events, then async results
            loop {
                match self.events.try_recv() {
                    Ok(ev) => self.on_chat_event(ev),
                    Err(broadcast::error::TryRecvError::Lagged(n)) => {
                        warn!("dropped {} chat events", n);
                    }
                    Err(_) => break,
                }
            }
            while let Ok(msg) = self.msg_rx.try_recv() {
                self.on_msg(msg);
            }

            if last_tick.elapsed() >= Duration::from_secs(1) {
                self.on_tick();
                last_tick = Instant::now();
            }

            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key),
                    Event::Paste(text) => self.on_paste(&text),
                    _ => {}
                }
            }
            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn render(&self, f: &mut Frame) {
        match self.screen {
            Screen::Chat => crate::ui::chat::render(f, self),
            _ => crate::ui::auth::render(f, self),
        }
    }

    // ─── Toasts ──────────────────────────────────────────────────────────

    fn toast(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            error: false,
            shown_at: Instant::now(),
        });
    }

    fn toast_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            error: true,
            shown_at: Instant::now(),
        });
    }

    fn on_tick(&mut self) {
        if self.screen == Screen::VerifyOtp {
            self.verify.otp.tick();
        }
        if let Some(status) = &self.status {
            if status.shown_at.elapsed() >= STATUS_TTL {
                self.status = None;
            }
        }
    }

    // ─── Async results ───────────────────────────────────────────────────

    fn on_msg(&mut self, msg: UiMsg) {
        match msg {
            UiMsg::SignedIn(Ok(user)) => {
                self.sign_in.busy = false;
                if let Err(e) = self.session.save(&user) {
                    warn!("failed to persist session: {}", e);
                }
                self.user = Some(user);
                self.toast("Welcome back! Redirecting to your dashboard...");
                self.enter_chat();
            }
            UiMsg::SignedIn(Err(e)) => {
                self.sign_in.busy = false;
                warn!("sign-in failed: {}", e);
                self.toast_error("We couldn't verify your credentials. Please try again.");
            }
            UiMsg::SignedUp(Ok(user)) => {
                self.sign_up.busy = false;
                info!(email = %user.email, "account created");
                self.toast("Account created successfully! Check your email for a code.");
                self.verify = VerifyState {
                    otp: OtpEntry::new(self.config.otp_resend_secs),
                    next: VerifyNext::SignIn,
                };
                self.screen = Screen::VerifyOtp;
            }
            UiMsg::SignedUp(Err(e)) => {
                self.sign_up.busy = false;
                warn!("sign-up failed: {}", e);
                self.toast_error("Something went wrong. Please try again or contact support.");
            }
            UiMsg::ResetRequested(Ok(())) => {
                self.forgot.busy = false;
                self.forgot_sent = true;
                self.toast("Reset link sent to your email!");
            }
            UiMsg::ResetRequested(Err(e)) => {
                self.forgot.busy = false;
                warn!("password reset failed: {}", e);
                self.toast_error("Something went wrong. Please try again.");
            }
            UiMsg::CodeVerified(Ok(true)) => {
                self.verify.otp.set_status(OtpStatus::Success);
                match self.verify.next {
                    VerifyNext::ResetPassword => {
                        self.reset = FormState::reset();
                        self.screen = Screen::ResetPassword;
                    }
                    VerifyNext::SignIn => {
                        self.toast("Verified! You can sign in now.");
                        self.sign_in = FormState::sign_in();
                        self.screen = Screen::SignIn;
                    }
                }
            }
            UiMsg::CodeVerified(Ok(false)) => {
                self.verify.otp.set_status(OtpStatus::Error);
                self.toast_error("That code didn't match. Try again.");
            }
            UiMsg::CodeVerified(Err(e)) => {
                self.verify.otp.set_status(OtpStatus::Error);
                warn!("verification failed: {}", e);
                self.toast_error("Something went wrong. Please try again.");
            }
            UiMsg::ConversationsLoaded(Ok(conversations)) => {
                self.chat.loading_list = false;
                self.chat.list.set_conversations(conversations);
                if self.chat.list.selected_id().is_none() {
                    // Open the most recent conversation by default
                    let first = self.chat.list.visible().first().map(|c| c.id.clone());
                    if let Some(id) = first {
                        self.open_conversation(id);
                    }
                }
            }
            UiMsg::ConversationsLoaded(Err(e)) => {
                self.chat.loading_list = false;
                warn!("conversation load failed: {}", e);
                self.toast_error("Something went wrong");
            }
            UiMsg::MessagesLoaded {
                conversation_id,
                result,
            } => {
                // A slow load for a conversation we already left is stale
                if self.chat.list.selected_id() != Some(conversation_id.as_str()) {
                    return;
                }
                self.chat.loading_thread = false;
                match result {
                    Ok(messages) => self.chat.thread.load(conversation_id, messages),
                    Err(e) => {
                        warn!("message load failed: {}", e);
                        self.toast_error("Something went wrong");
                    }
                }
            }
        }
    }

    fn on_chat_event(&mut self, event: ChatEvent) {
        self.chat.thread.apply(&event);
    }

    // ─── Screen transitions ──────────────────────────────────────────────

    fn enter_chat(&mut self) {
        self.screen = Screen::Chat;
        self.chat = ChatState::new();
        self.chat.loading_list = true;
        let backend = self.backend.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(UiMsg::ConversationsLoaded(backend.list_conversations().await));
        });
    }

    fn open_conversation(&mut self, id: String) {
        if self.chat.list.select(&id).is_none() {
            return;
        }
        self.chat.loading_thread = true;
        let backend = self.backend.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = backend.messages_for(&id).await;
            let _ = tx.send(UiMsg::MessagesLoaded {
                conversation_id: id,
                result,
            });
        });
    }

    fn sign_out(&mut self) {
        if let Err(e) = self.session.clear() {
            warn!("failed to clear session: {}", e);
        }
        self.user = None;
        self.sign_in = FormState::sign_in();
        self.chat = ChatState::new();
        self.screen = Screen::SignIn;
        self.toast("Signed out");
    }

    // ─── Submissions ─────────────────────────────────────────────────────

    fn submit_sign_in(&mut self) {
        let email = self.sign_in.value("email").to_string();
        let password = self.sign_in.value("password").to_string();
        self.sign_in.errors = validate::validate_sign_in(&email, &password);
        if !self.sign_in.errors.is_empty() {
            return;
        }
        self.sign_in.busy = true;
        let backend = self.backend.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = backend.sign_in(Credentials { email, password }).await;
            let _ = tx.send(UiMsg::SignedIn(result));
        });
    }

    fn submit_sign_up(&mut self) {
        let form = SignUpForm {
            name: self.sign_up.value("name").to_string(),
            email: self.sign_up.value("email").to_string(),
            password: self.sign_up.value("password").to_string(),
            confirm_password: self.sign_up.value("confirmPassword").to_string(),
        };
        self.sign_up.errors = validate::validate_sign_up(
            &form.name,
            &form.email,
            &form.password,
            &form.confirm_password,
        );
        if !self.sign_up.errors.is_empty() {
            return;
        }
        self.sign_up.busy = true;
        let backend = self.backend.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(UiMsg::SignedUp(backend.sign_up(form).await));
        });
    }

    fn submit_forgot(&mut self) {
        let email = self.forgot.value("email").to_string();
        self.forgot.errors = validate::validate_forgot_password(&email);
        if !self.forgot.errors.is_empty() {
            return;
        }
        self.forgot.busy = true;
        let backend = self.backend.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(UiMsg::ResetRequested(
                backend.request_password_reset(&email).await,
            ));
        });
    }

    fn submit_verify(&mut self) {
        if self.verify.otp.status() == OtpStatus::Verifying {
            return;
        }
        let Some(code) = self.verify.otp.code() else {
            return;
        };
        self.verify.otp.set_status(OtpStatus::Verifying);
        let backend = self.backend.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(UiMsg::CodeVerified(backend.verify_code(&code).await));
        });
    }

    fn submit_reset(&mut self) {
        let password = self.reset.value("password").to_string();
        let confirm = self.reset.value("confirmPassword").to_string();
        self.reset.errors = validate::validate_reset_password(&password, &confirm);
        if !self.reset.errors.is_empty() {
            return;
        }
        self.toast("Password reset successfully!");
        self.sign_in = FormState::sign_in();
        self.screen = Screen::SignIn;
    }

    // ─── Input ───────────────────────────────────────────────────────────

    fn on_paste(&mut self, text: &str) {
        match self.screen {
            Screen::VerifyOtp => self.verify.otp.paste(text),
            Screen::Chat => {
                if self.chat.focus == ChatFocus::Composer {
                    self.chat.composer.push_str(text);
                }
            }
            _ => {
                let form = self.active_form_mut();
                let focus = form.focus;
                form.fields[focus].push_str(text);
            }
        }
    }

    fn active_form_mut(&mut self) -> &mut FormState {
        match self.screen {
            Screen::SignUp => &mut self.sign_up,
            Screen::ForgotPassword => &mut self.forgot,
            Screen::ResetPassword => &mut self.reset,
            _ => &mut self.sign_in,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.screen {
            Screen::SignIn => self.on_sign_in_key(key),
            Screen::SignUp => self.on_sign_up_key(key),
            Screen::ForgotPassword => self.on_forgot_key(key),
            Screen::VerifyOtp => self.on_verify_key(key),
            Screen::ResetPassword => self.on_reset_key(key),
            Screen::Chat => self.on_chat_key(key),
        }
    }

    fn on_form_key(form: &mut FormState, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                form.focus_next();
                true
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.focus_prev();
                true
            }
            KeyCode::Backspace => {
                let focus = form.focus;
                form.fields[focus].backspace();
                form.errors.clear();
                true
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let focus = form.focus;
                form.fields[focus].push(c);
                form.errors.clear();
                true
            }
            _ => false,
        }
    }

    fn on_sign_in_key(&mut self, key: KeyEvent) {
        if self.sign_in.busy {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => {
                    self.sign_up = FormState::sign_up();
                    self.screen = Screen::SignUp;
                    return;
                }
                KeyCode::Char('f') => {
                    self.forgot = FormState::forgot();
                    self.forgot_sent = false;
                    self.screen = Screen::ForgotPassword;
                    return;
                }
                _ => {}
            }
        }
        if key.code == KeyCode::Enter {
            self.submit_sign_in();
            return;
        }
        Self::on_form_key(&mut self.sign_in, key);
    }

    fn on_sign_up_key(&mut self, key: KeyEvent) {
        if self.sign_up.busy {
            return;
        }
        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::SignIn;
            }
            KeyCode::Enter => self.submit_sign_up(),
            _ => {
                Self::on_form_key(&mut self.sign_up, key);
            }
        }
    }

    fn on_forgot_key(&mut self, key: KeyEvent) {
        if self.forgot.busy {
            return;
        }
        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::SignIn;
            }
            KeyCode::Enter if self.forgot_sent => {
                // Continue to code entry once the mock email is "sent"
                self.verify = VerifyState {
                    otp: OtpEntry::new(self.config.otp_resend_secs),
                    next: VerifyNext::ResetPassword,
                };
                self.screen = Screen::VerifyOtp;
            }
            KeyCode::Enter => self.submit_forgot(),
            _ => {
                Self::on_form_key(&mut self.forgot, key);
            }
        }
    }

    fn on_verify_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::SignIn;
            }
            KeyCode::Enter => self.submit_verify(),
            KeyCode::Backspace => self.verify.otp.backspace(),
            KeyCode::Char(c) if c.is_ascii_digit() => self.verify.otp.enter_digit(c),
            KeyCode::Char('r') => {
                if self.verify.otp.can_resend() {
                    self.verify.otp.resend();
                    self.toast("A new code is on its way");
                }
            }
            _ => {}
        }
    }

    fn on_reset_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::SignIn;
            }
            KeyCode::Enter => self.submit_reset(),
            _ => {
                Self::on_form_key(&mut self.reset, key);
            }
        }
    }

    fn on_chat_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('l') => {
                    self.sign_out();
                    return;
                }
                KeyCode::Char('r') => {
                    self.reply_to_last_received();
                    return;
                }
                KeyCode::Char('g') => {
                    self.react_to_last_message();
                    return;
                }
                _ => {}
            }
        }
        match self.chat.focus {
            ChatFocus::Search => self.on_search_key(key),
            ChatFocus::Sidebar => self.on_sidebar_key(key),
            ChatFocus::Composer => self.on_composer_key(key),
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.chat.search_input.clear();
                self.chat.list.clear_search();
                self.chat.focus = ChatFocus::Sidebar;
            }
            KeyCode::Enter => {
                self.chat.focus = ChatFocus::Sidebar;
            }
            KeyCode::Backspace => {
                self.chat.search_input.pop();
                self.chat.list.search(self.chat.search_input.clone());
                self.chat.cursor = 0;
            }
            KeyCode::Char(c) => {
                self.chat.search_input.push(c);
                self.chat.list.search(self.chat.search_input.clone());
                self.chat.cursor = 0;
            }
            _ => {}
        }
    }

    fn on_sidebar_key(&mut self, key: KeyEvent) {
        let visible_len = self.chat.list.visible().len();
        match key.code {
            KeyCode::Tab => self.chat.focus = ChatFocus::Composer,
            KeyCode::Char('/') => self.chat.focus = ChatFocus::Search,
            KeyCode::Up => {
                self.chat.cursor = self.chat.cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                if visible_len > 0 && self.chat.cursor < visible_len - 1 {
                    self.chat.cursor += 1;
                }
            }
            KeyCode::Enter => {
                let id = self
                    .chat
                    .list
                    .visible()
                    .get(self.chat.cursor)
                    .map(|c| c.id.clone());
                if let Some(id) = id {
                    self.open_conversation(id);
                    self.chat.focus = ChatFocus::Composer;
                }
            }
            KeyCode::Char('f') => {
                let next = self.chat.list.filter().next();
                self.chat.list.set_filter(next);
                self.chat.cursor = 0;
            }
            KeyCode::Char('s') => {
                let next = self.chat.list.sort().next();
                self.chat.list.set_sort(next);
                self.chat.cursor = 0;
            }
            KeyCode::Char('*') => {
                let id = self
                    .chat
                    .list
                    .visible()
                    .get(self.chat.cursor)
                    .map(|c| c.id.clone());
                if let Some(id) = id {
                    if self.chat.list.toggle_favorite(&id) {
                        self.toast("Added to favorites");
                    } else {
                        self.toast("Removed from favorites");
                    }
                }
            }
            _ => {}
        }
    }

    fn on_composer_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.chat.focus = ChatFocus::Sidebar,
            KeyCode::Esc => {
                self.chat.thread.set_replying_to(None);
            }
            KeyCode::Enter => self.send_current_message(),
            KeyCode::Backspace => {
                self.chat.composer.pop();
            }
            KeyCode::Char(c) => self.chat.composer.push(c),
            _ => {}
        }
    }

    fn send_current_message(&mut self) {
        let Some(conversation) = self.chat.list.selected().cloned() else {
            return;
        };
        let reply_to = self.chat.thread.take_replying_to();
        match self
            .engine
            .send(&conversation, &self.chat.composer, reply_to, &self.backend)
        {
            Some(message) => {
                self.chat.thread.append(message);
                self.chat.composer.clear();
            }
            None => self.chat.composer.clear(),
        }
    }

    /// Quote the most recent message from the other side in the composer
    fn reply_to_last_received(&mut self) {
        let reply = self
            .chat
            .thread
            .messages()
            .iter()
            .rev()
            .find(|m| m.direction == MessageDirection::Received)
            .map(reply_ref);
        if reply.is_some() {
            self.chat.thread.set_replying_to(reply);
            self.chat.focus = ChatFocus::Composer;
        }
    }

    fn react_to_last_message(&mut self) {
        let last_id = self.chat.thread.messages().last().map(|m| m.id.clone());
        if let Some(id) = last_id {
            self.chat.thread.add_reaction(&id, "👍");
        }
    }
}
