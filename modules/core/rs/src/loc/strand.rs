use std::fmt::Display;

#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use eyre::{eyre, Report};

/// Strand of a sequencing read. Determines the direction in which the read is extended into a fragment.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(i8)]
pub enum Strand {
    /// Reads are extended downstream, towards larger coordinates.
    Forward = 1,
    /// Reads are extended upstream, towards smaller coordinates.
    Reverse = -1,
}

impl Strand {
    pub fn symbol(&self) -> char {
        match self {
            Self::Forward => '+',
            Self::Reverse => '-',
        }
    }

    /// Numeric flag used by fixed-width read tracks: 0 for forward reads, 1 for reverse reads.
    pub fn flag(&self) -> u8 {
        match self {
            Self::Forward => 0,
            Self::Reverse => 1,
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for Strand {
    type Error = Report;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '+' => Ok(Self::Forward),
            '-' => Ok(Self::Reverse),
            _ => Err(eyre!("Unknown strand tag: {value:?}")),
        }
    }
}

impl TryFrom<&str> for Strand {
    type Error = Report;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut symbols = value.chars();
        match (symbols.next(), symbols.next()) {
            (Some(symbol), None) => Self::try_from(symbol),
            _ => Err(eyre!("Unknown strand tag: {value:?}")),
        }
    }
}

impl TryFrom<u8> for Strand {
    type Error = Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Forward),
            1 => Ok(Self::Reverse),
            _ => Err(eyre!("Unknown strand flag: {value} (expected 0 or 1)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_display() {
        assert_eq!(format!("{}", Strand::Forward), "+");
        assert_eq!(format!("{}", Strand::Reverse), "-");
    }

    #[test]
    fn test_strand_from_tags() {
        assert_eq!(Strand::try_from('+').unwrap(), Strand::Forward);
        assert_eq!(Strand::try_from('-').unwrap(), Strand::Reverse);
        assert_eq!(Strand::try_from("-").unwrap(), Strand::Reverse);
        assert!(Strand::try_from('x').is_err());
        assert!(Strand::try_from(".").is_err());
        assert!(Strand::try_from("+-").is_err());
        assert!(Strand::try_from("").is_err());
    }

    #[test]
    fn test_strand_flags() {
        for strand in [Strand::Forward, Strand::Reverse] {
            assert_eq!(Strand::try_from(strand.flag()).unwrap(), strand);
        }
        assert!(Strand::try_from(2u8).is_err());
    }
}
