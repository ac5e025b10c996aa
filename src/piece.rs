use std::fmt;

pub const PIECE_SHAPES: usize = 7;
pub const PIECE_ORDER: &str = "IJLOSTZ";

/// The seven tetromino shapes, in the fixed order used by the graph file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Shape {
    I = 0,
    J = 1,
    L = 2,
    O = 3,
    S = 4,
    T = 5,
    Z = 6,
}

impl Shape {
    pub const ALL: [Shape; PIECE_SHAPES] = [Shape::I, Shape::J, Shape::L, Shape::O, Shape::S, Shape::T, Shape::Z];

    #[inline]
    pub fn index(self) -> usize { self as usize }

    pub fn from_index(i: usize) -> Option<Shape> { Self::ALL.get(i).copied() }

    pub fn from_char(c: char) -> Option<Shape> {
        PIECE_ORDER.find(c).and_then(Shape::from_index)
    }

    pub fn to_char(self) -> char { PIECE_ORDER.as_bytes()[self.index()] as char }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.to_char()) }
}

/// Set of shapes not yet revealed in the current 7-bag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bag(u8);

impl Bag {
    pub const EMPTY: Bag = Bag(0);
    pub const FULL: Bag = Bag((1 << PIECE_SHAPES) - 1);

    pub fn from_bits(bits: u8) -> Bag { Bag(bits & Self::FULL.0) }
    pub fn bits(self) -> u8 { self.0 }

    #[inline]
    pub fn len(self) -> usize { self.0.count_ones() as usize }
    #[inline]
    pub fn is_empty(self) -> bool { self.0 == 0 }
    #[inline]
    pub fn contains(self, s: Shape) -> bool { self.0 & (1 << s.index()) != 0 }

    pub fn insert(&mut self, s: Shape) { self.0 |= 1 << s.index(); }
    pub fn remove(&mut self, s: Shape) { self.0 &= !(1 << s.index()); }

    #[inline]
    pub fn without(self, s: Shape) -> Bag { Bag(self.0 & !(1 << s.index())) }

    /// An exhausted bag is replenished with all seven shapes.
    #[inline]
    pub fn refilled(self) -> Bag { if self.is_empty() { Self::FULL } else { self } }

    /// Members in ascending shape order.
    pub fn iter(self) -> impl Iterator<Item = Shape> {
        Shape::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl FromIterator<Shape> for Bag {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        let mut b = Bag::EMPTY;
        for s in iter { b.insert(s); }
        b
    }
}

impl fmt::Display for Bag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in self.iter() { write!(f, "{}", s)?; }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_letters_round_trip() {
        for s in Shape::ALL {
            assert_eq!(Shape::from_char(s.to_char()), Some(s));
        }
        assert_eq!(Shape::from_char('X'), None);
        assert_eq!(Shape::T.index(), 5);
    }

    #[test]
    fn bag_set_operations() {
        let b: Bag = "TSZ".chars().filter_map(Shape::from_char).collect();
        assert_eq!(b.len(), 3);
        assert_eq!(b.to_string(), "STZ");
        assert!(!b.without(Shape::S).contains(Shape::S));
        assert_eq!(Bag::EMPTY.refilled(), Bag::FULL);
        assert_eq!(b.refilled(), b);
    }
}
