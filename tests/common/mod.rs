#![allow(dead_code)]

pub mod predict_server;
