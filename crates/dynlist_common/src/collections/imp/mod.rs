pub(crate) mod raw_buffer;
