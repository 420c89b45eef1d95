/// Cyclic cursor over a fixed list of choices.
///
/// Used for the main menu and every priority picker. Moving past either end
/// wraps around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoicePicker<T> {
    options: Vec<T>,
    selected: usize,
}

impl<T> ChoicePicker<T> {
    pub fn new(options: Vec<T>) -> Self {
        Self {
            options,
            selected: 0,
        }
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&T> {
        self.options.get(self.selected)
    }

    pub fn move_up(&mut self) {
        let n = self.options.len();
        if n > 0 {
            self.selected = (self.selected + n - 1) % n;
        }
    }

    pub fn move_down(&mut self) {
        let n = self.options.len();
        if n > 0 {
            self.selected = (self.selected + 1) % n;
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }
}

impl<T: PartialEq> ChoicePicker<T> {
    /// Place the cursor on `value`; unknown values leave it untouched.
    pub fn select(&mut self, value: &T) {
        if let Some(index) = self.options.iter().position(|o| o == value) {
            self.selected = index;
        }
    }
}
