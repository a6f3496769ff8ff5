pub mod pvlng;
