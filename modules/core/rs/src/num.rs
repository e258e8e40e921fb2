use std::fmt::Debug;

/// T values are primitive integers
pub trait PrimInt: ::num::PrimInt + Debug + Default {}
impl<T: ::num::PrimInt + Debug + Default> PrimInt for T {}

/// T values are signed primitive integers. Genomic coordinates of extended fragments can go below zero.
pub trait PrimSInt: PrimInt + ::num::Signed {}
impl<T: PrimInt + ::num::Signed> PrimSInt for T {}

/// T values are float numbers
pub trait Float: ::num::Float + Debug + Default {}
impl<T: ::num::Float + Debug + Default> Float for T {}
