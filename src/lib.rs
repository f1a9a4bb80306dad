pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod fixtures;
pub mod http;
pub mod navigation;
pub mod pages;
pub mod rest;
pub mod routes;
pub mod session;
pub mod storage;
pub mod stub;
pub mod threadpool;
pub mod validation;
