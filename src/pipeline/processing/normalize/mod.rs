// Normalizers rewrite values in place toward their canonical form:
// header names and projected columns, then century-misparsed dates.

pub mod columns;
pub mod dates;
