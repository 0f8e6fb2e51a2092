pub mod yobit;
