/// Single-line text field state for the auth forms
#[derive(Debug, Clone)]
pub struct TextField {
    label: &'static str,
    /// Field name matching the validation rule set
    field: &'static str,
    value: String,
    masked: bool,
}

impl TextField {
    pub fn new(label: &'static str, field: &'static str) -> Self {
        Self {
            label,
            field,
            value: String::new(),
            masked: false,
        }
    }

    pub fn masked(label: &'static str, field: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label, field)
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.value.push(c);
        }
    }

    pub fn push_str(&mut self, s: &str) {
        for c in s.chars() {
            self.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Masked fields render bullets instead of their content
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_display_hides_content() {
        let mut field = TextField::masked("Password", "password");
        field.push_str("Secret1");
        assert_eq!(field.value(), "Secret1");
        assert_eq!(field.display(), "•••••••");
    }

    #[test]
    fn control_chars_are_dropped() {
        let mut field = TextField::new("Email", "email");
        field.push('a');
        field.push('\n');
        field.push('\t');
        field.push('b');
        assert_eq!(field.value(), "ab");
    }

    #[test]
    fn backspace_pops_one_char() {
        let mut field = TextField::new("Email", "email");
        field.push_str("abc");
        field.backspace();
        assert_eq!(field.value(), "ab");
        field.clear();
        field.backspace();
        assert_eq!(field.value(), "");
    }
}
