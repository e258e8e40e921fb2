use derive_getters::Dissolve;
use derive_more::Constructor;

use super::strand::Strand;

/// A struct that holds data for each strand.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Dissolve, Constructor,
)]
pub struct PerStrand<T> {
    pub forward: T,
    pub reverse: T,
}

impl<T> PerStrand<T> {
    /// Gets a reference to the data for the specified strand.
    pub fn get(&self, strand: Strand) -> &T {
        match strand {
            Strand::Forward => &self.forward,
            Strand::Reverse => &self.reverse,
        }
    }

    /// Gets a mutable reference to the data for the specified strand.
    pub fn get_mut(&mut self, strand: Strand) -> &mut T {
        match strand {
            Strand::Forward => &mut self.forward,
            Strand::Reverse => &mut self.reverse,
        }
    }

    /// Gets an iterator over the data for each strand. Order is forward, reverse.
    pub fn iter(&self) -> impl Iterator<Item = (Strand, &T)> {
        [(Strand::Forward, &self.forward), (Strand::Reverse, &self.reverse)].into_iter()
    }

    /// Applies a function to each strand.
    pub fn apply(&mut self, mut f: impl FnMut(Strand, &mut T)) -> &mut Self {
        f(Strand::Forward, &mut self.forward);
        f(Strand::Reverse, &mut self.reverse);
        self
    }

    /// Maps each strand to a new value.
    pub fn map<U>(self, mut f: impl FnMut(Strand, T) -> U) -> PerStrand<U> {
        PerStrand {
            forward: f(Strand::Forward, self.forward),
            reverse: f(Strand::Reverse, self.reverse),
        }
    }
}

impl<T> IntoIterator for PerStrand<T> {
    type Item = (Strand, T);
    type IntoIter = std::array::IntoIter<(Strand, T), 2>;

    fn into_iter(self) -> Self::IntoIter {
        [(Strand::Forward, self.forward), (Strand::Reverse, self.reverse)].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_strand_access() {
        let mut data = PerStrand::new(vec![1], vec![2, 3]);
        data.get_mut(Strand::Reverse).push(4);

        assert_eq!(data.get(Strand::Forward), &vec![1]);
        assert_eq!(data.get(Strand::Reverse), &vec![2, 3, 4]);

        let lengths = data.map(|_, x| x.len());
        assert_eq!(
            lengths.into_iter().collect::<Vec<_>>(),
            vec![(Strand::Forward, 1), (Strand::Reverse, 3)]
        );
    }
}
