// src/resolver/emptiness.rs

/// Decides whether a value a probe returned counts as "found nothing".
pub trait Emptiness {
    fn is_empty_value(&self) -> bool;
}

impl Emptiness for String {
    fn is_empty_value(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Emptiness for &str {
    fn is_empty_value(&self) -> bool {
        self.trim().is_empty()
    }
}

/// Empty when every element is empty (including no elements at all).
impl<U: Emptiness> Emptiness for Vec<U> {
    fn is_empty_value(&self) -> bool {
        self.iter().all(Emptiness::is_empty_value)
    }
}

impl<U: Emptiness> Emptiness for Option<U> {
    fn is_empty_value(&self) -> bool {
        self.as_ref().map_or(true, |v| v.is_empty_value())
    }
}
