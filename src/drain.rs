use rsmpeg::error::RsmpegError;

/// True for the two results that end a receive loop without failing it:
/// the codec needs more input (EAGAIN) or has been fully flushed (EOF).
pub fn is_drained(error: &RsmpegError) -> bool {
    matches!(
        error,
        RsmpegError::DecoderDrainError
            | RsmpegError::DecoderFlushedError
            | RsmpegError::EncoderDrainError
            | RsmpegError::EncoderFlushedError
    )
}

/// Calls `receive` until the codec reports it has nothing more to hand out,
/// collecting what it produced. Any other error drops the collected items
/// and is returned.
pub fn drain<T, F>(mut receive: F) -> Result<Vec<T>, RsmpegError>
where
    F: FnMut() -> Result<T, RsmpegError>,
{
    let mut received = Vec::new();

    loop {
        match receive() {
            Ok(item) => received.push(item),
            Err(error) if is_drained(&error) => break,
            Err(error) => return Err(error),
        }
    }

    Ok(received)
}
