pub mod create_event;
