/// OTP entry: six single-digit slots acting as one 6-digit code
///
/// Focus handling mirrors the usual web widget: typing a digit advances,
/// backspace on an empty slot retreats, pasting an all-digit string fills
/// from the start.

pub const OTP_LEN: usize = 6;

/// Outcome of the last verification attempt, shown as a visual tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpStatus {
    Idle,
    Verifying,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct OtpEntry {
    slots: [Option<char>; OTP_LEN],
    focus: usize,
    status: OtpStatus,
    resend_cooldown: u64,
    resend_remaining: u64,
}

impl OtpEntry {
    pub fn new(resend_cooldown_secs: u64) -> Self {
        Self {
            slots: [None; OTP_LEN],
            focus: 0,
            status: OtpStatus::Idle,
            resend_cooldown: resend_cooldown_secs,
            resend_remaining: resend_cooldown_secs,
        }
    }

    pub fn slots(&self) -> &[Option<char>; OTP_LEN] {
        &self.slots
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn status(&self) -> OtpStatus {
        self.status
    }

    pub fn set_status(&mut self, status: OtpStatus) {
        self.status = status;
    }

    /// Fill the focused slot and auto-advance; non-digits are rejected
    pub fn enter_digit(&mut self, c: char) {
        if self.status == OtpStatus::Verifying || !c.is_ascii_digit() {
            return;
        }
        self.slots[self.focus] = Some(c);
        if self.focus < OTP_LEN - 1 {
            self.focus += 1;
        }
    }

    /// Clear the focused slot, or move focus back when it is already empty
    pub fn backspace(&mut self) {
        if self.status == OtpStatus::Verifying {
            return;
        }
        if self.slots[self.focus].is_some() {
            self.slots[self.focus] = None;
        } else if self.focus > 0 {
            self.focus -= 1;
        }
    }

    /// Paste an all-digit string, filling slots from the start; focus lands
    /// on the first empty slot, or the last slot when all are filled
    pub fn paste(&mut self, text: &str) {
        if self.status == OtpStatus::Verifying {
            return;
        }
        let pasted = text.trim();
        if pasted.is_empty() || !pasted.chars().all(|c| c.is_ascii_digit()) {
            return;
        }
        for (i, digit) in pasted.chars().take(OTP_LEN).enumerate() {
            self.slots[i] = Some(digit);
        }
        self.focus = self
            .slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(OTP_LEN - 1);
    }

    /// The complete code, once every slot is filled
    pub fn code(&self) -> Option<String> {
        if self.slots.iter().all(Option::is_some) {
            Some(self.slots.iter().flatten().collect())
        } else {
            None
        }
    }

    /// One-second countdown tick for the resend cooldown
    pub fn tick(&mut self) {
        self.resend_remaining = self.resend_remaining.saturating_sub(1);
    }

    pub fn resend_remaining(&self) -> u64 {
        self.resend_remaining
    }

    pub fn can_resend(&self) -> bool {
        self.resend_remaining == 0
    }

    /// Start over after a resend: clear slots and status, restart the timer
    pub fn resend(&mut self) {
        if !self.can_resend() {
            return;
        }
        self.slots = [None; OTP_LEN];
        self.focus = 0;
        self.status = OtpStatus::Idle;
        self.resend_remaining = self.resend_cooldown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_advance_focus() {
        let mut entry = OtpEntry::new(30);
        entry.enter_digit('1');
        entry.enter_digit('2');
        assert_eq!(entry.focus(), 2);
        assert_eq!(entry.slots()[0], Some('1'));
        assert_eq!(entry.slots()[1], Some('2'));
        assert_eq!(entry.code(), None);
    }

    #[test]
    fn non_digits_rejected() {
        let mut entry = OtpEntry::new(30);
        entry.enter_digit('x');
        entry.enter_digit(' ');
        assert_eq!(entry.focus(), 0);
        assert!(entry.slots().iter().all(Option::is_none));
    }

    #[test]
    fn focus_stops_at_last_slot() {
        let mut entry = OtpEntry::new(30);
        for c in "123456".chars() {
            entry.enter_digit(c);
        }
        assert_eq!(entry.focus(), OTP_LEN - 1);
        assert_eq!(entry.code().as_deref(), Some("123456"));
        // Another digit overwrites the last slot
        entry.enter_digit('9');
        assert_eq!(entry.code().as_deref(), Some("123459"));
    }

    #[test]
    fn backspace_clears_then_retreats() {
        let mut entry = OtpEntry::new(30);
        entry.enter_digit('1');
        entry.enter_digit('2');
        // Focus is on empty slot 2: retreat to slot 1
        entry.backspace();
        assert_eq!(entry.focus(), 1);
        // Slot 1 holds '2': clear it in place
        entry.backspace();
        assert_eq!(entry.focus(), 1);
        assert_eq!(entry.slots()[1], None);
    }

    #[test]
    fn paste_fills_all_slots() {
        let mut entry = OtpEntry::new(30);
        entry.paste("123456");
        let digits: Vec<char> = entry.slots().iter().flatten().copied().collect();
        assert_eq!(digits, vec!['1', '2', '3', '4', '5', '6']);
        assert_eq!(entry.focus(), OTP_LEN - 1);
        assert_eq!(entry.code().as_deref(), Some("123456"));
    }

    #[test]
    fn partial_paste_focuses_first_empty() {
        let mut entry = OtpEntry::new(30);
        entry.paste("123");
        assert_eq!(entry.focus(), 3);
        assert_eq!(entry.code(), None);
    }

    #[test]
    fn paste_rejects_non_digits_and_truncates_overlong() {
        let mut entry = OtpEntry::new(30);
        entry.paste("12a456");
        assert!(entry.slots().iter().all(Option::is_none));
        entry.paste("1234567890");
        assert_eq!(entry.code().as_deref(), Some("123456"));
    }

    #[test]
    fn resend_waits_for_cooldown() {
        let mut entry = OtpEntry::new(2);
        entry.paste("123456");
        entry.set_status(OtpStatus::Error);
        entry.resend();
        // Cooldown still running: nothing changes
        assert_eq!(entry.code().as_deref(), Some("123456"));
        entry.tick();
        entry.tick();
        assert!(entry.can_resend());
        entry.resend();
        assert_eq!(entry.code(), None);
        assert_eq!(entry.status(), OtpStatus::Idle);
        assert_eq!(entry.resend_remaining(), 2);
    }

    #[test]
    fn input_ignored_while_verifying() {
        let mut entry = OtpEntry::new(30);
        entry.paste("123456");
        entry.set_status(OtpStatus::Verifying);
        entry.enter_digit('9');
        entry.backspace();
        entry.paste("654321");
        assert_eq!(entry.code().as_deref(), Some("123456"));
    }
}
