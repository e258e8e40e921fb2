pub mod breakpoints;
