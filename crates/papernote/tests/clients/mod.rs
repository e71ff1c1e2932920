use super::*;

mod openalex;
mod paperswithcode;
