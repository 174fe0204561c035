//! Search form state: spirit selector, secondary ingredient, juices, name.
//!
//! Only the cocktail name drives the lookup; the other fields are kept as
//! form state for the user's own reference.

/// Fixed option list for the primary spirit selector.
pub const PRIMARY_SPIRITS: &[&str] = &[
    "Vodka", "Gin", "Rum", "Tequila", "Mezcal", "Whiskey", "Bourbon", "Rye", "Scotch", "Brandy",
    "Cognac",
];

/// Maximum length for any text field.
const MAX_FIELD_LENGTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Spirit,
    Secondary,
    Juice(usize),
    Name,
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    /// Index into `PRIMARY_SPIRITS`; `None` is the "Select..." choice.
    pub spirit: Option<usize>,
    pub secondary: String,
    /// Always holds at least one entry.
    pub juices: Vec<String>,
    pub name: String,
    pub focus: FormField,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            spirit: None,
            secondary: String::new(),
            juices: vec![String::new()],
            name: String::new(),
            focus: FormField::Name,
        }
    }
}

impl SearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields in tab order.
    pub fn fields(&self) -> Vec<FormField> {
        let mut fields = vec![FormField::Spirit, FormField::Secondary];
        fields.extend((0..self.juices.len()).map(FormField::Juice));
        fields.extend([FormField::Name, FormField::Submit]);
        fields
    }

    fn focus_index(&self) -> usize {
        self.fields()
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0)
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        self.focus = fields[(self.focus_index() + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.fields();
        let index = self.focus_index();
        self.focus = fields[(index + fields.len() - 1) % fields.len()];
    }

    pub fn spirit_label(&self) -> &'static str {
        self.spirit
            .and_then(|i| PRIMARY_SPIRITS.get(i).copied())
            .unwrap_or("Select...")
    }

    /// Cycle the spirit selector through "Select..." and every option.
    pub fn cycle_spirit(&mut self, forward: bool) {
        let count = PRIMARY_SPIRITS.len();
        self.spirit = match (self.spirit, forward) {
            (None, true) => Some(0),
            (None, false) => Some(count - 1),
            (Some(i), true) if i + 1 < count => Some(i + 1),
            (Some(_), true) => None,
            (Some(0), false) => None,
            (Some(i), false) => Some(i - 1),
        };
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Secondary => Some(&mut self.secondary),
            FormField::Juice(i) => self.juices.get_mut(i),
            FormField::Name => Some(&mut self.name),
            FormField::Spirit | FormField::Submit => None,
        }
    }

    /// Type a character into the focused text field. Returns false if rejected.
    pub fn insert_char(&mut self, c: char) -> bool {
        match self.focused_text_mut() {
            Some(text) if can_add_char(text.chars().count(), c) => {
                text.push(c);
                true
            }
            _ => false,
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    /// Add an empty juice field after the focused one (or at the end) and focus it.
    pub fn add_juice(&mut self) {
        let index = match self.focus {
            FormField::Juice(i) => i + 1,
            _ => self.juices.len(),
        };
        self.juices.insert(index, String::new());
        self.focus = FormField::Juice(index);
    }

    /// Remove the focused juice field. The last remaining field is never removed.
    pub fn remove_juice(&mut self) -> bool {
        let FormField::Juice(i) = self.focus else {
            return false;
        };
        if self.juices.len() <= 1 || i >= self.juices.len() {
            return false;
        }
        self.juices.remove(i);
        self.focus = FormField::Juice(i.min(self.juices.len() - 1));
        true
    }

    /// Non-empty juices, trimmed.
    pub fn filled_juices(&self) -> Vec<&str> {
        self.juices
            .iter()
            .map(|j| j.trim())
            .filter(|j| !j.is_empty())
            .collect()
    }
}

/// Check if a character should be accepted into a field of `current_len` chars
pub fn can_add_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && !c.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form_has_one_juice() {
        let form = SearchForm::new();
        assert_eq!(form.juices.len(), 1);
        assert_eq!(form.focus, FormField::Name);
        assert_eq!(form.spirit_label(), "Select...");
    }

    #[test]
    fn test_focus_cycles_through_fields() {
        let mut form = SearchForm::new();
        form.focus_next();
        assert_eq!(form.focus, FormField::Submit);
        form.focus_next();
        assert_eq!(form.focus, FormField::Spirit); // Wraps around
        form.focus_prev();
        assert_eq!(form.focus, FormField::Submit);
    }

    #[test]
    fn test_add_and_remove_juice() {
        let mut form = SearchForm::new();
        form.focus = FormField::Juice(0);
        form.insert_char('l');
        form.add_juice();
        assert_eq!(form.juices.len(), 2);
        assert_eq!(form.focus, FormField::Juice(1));

        assert!(form.remove_juice());
        assert_eq!(form.juices, vec!["l"]);
        assert_eq!(form.focus, FormField::Juice(0));

        // At least one juice field always remains
        assert!(!form.remove_juice());
        assert_eq!(form.juices.len(), 1);
    }

    #[test]
    fn test_remove_juice_requires_juice_focus() {
        let mut form = SearchForm::new();
        form.add_juice();
        form.focus = FormField::Name;
        assert!(!form.remove_juice());
        assert_eq!(form.juices.len(), 2);
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut form = SearchForm::new();
        for c in "Mojito".chars() {
            form.insert_char(c);
        }
        form.backspace();
        assert_eq!(form.name, "Mojit");

        form.focus = FormField::Spirit;
        assert!(!form.insert_char('x'));
    }

    #[test]
    fn test_cycle_spirit_wraps_through_select() {
        let mut form = SearchForm::new();
        form.cycle_spirit(false);
        assert_eq!(form.spirit_label(), *PRIMARY_SPIRITS.last().unwrap());
        form.cycle_spirit(true);
        assert_eq!(form.spirit, None);
        form.cycle_spirit(true);
        assert_eq!(form.spirit_label(), PRIMARY_SPIRITS[0]);
        form.cycle_spirit(false);
        assert_eq!(form.spirit, None);
    }

    #[test]
    fn test_can_add_char() {
        assert!(can_add_char(0, 'a'));
        assert!(can_add_char(MAX_FIELD_LENGTH - 1, 'z'));
        assert!(!can_add_char(MAX_FIELD_LENGTH, 'a'));
        assert!(!can_add_char(0, '\n'));
        assert!(!can_add_char(0, '\t'));
    }

    #[test]
    fn test_filled_juices() {
        let mut form = SearchForm::new();
        form.juices = vec![" lime ".to_string(), String::new(), "orange".to_string()];
        assert_eq!(form.filled_juices(), vec!["lime", "orange"]);
    }
}
