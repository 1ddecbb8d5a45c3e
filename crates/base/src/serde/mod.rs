pub mod epoch_seconds;
