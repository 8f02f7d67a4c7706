/*!
 * Kasa smart-home wire protocol.
 *
 * TP-Link Kasa devices speak JSON obfuscated with an "autokey" XOR cipher:
 * the key starts at 171 and each ciphertext byte becomes the key for the
 * next byte. TCP exchanges prefix the ciphertext with a 4-byte big-endian
 * length; UDP discovery datagrams carry the bare ciphertext.
 */
use bytes::{BufMut, Bytes, BytesMut};
use serde::Deserialize;
use serde_json::json;

use crate::gateway::{DeviceError, Result};

/// TCP and UDP port Kasa devices listen on
pub const KASA_PORT: u16 = 9999;

/// Initial key of the autokey cipher
const INITIAL_KEY: u8 = 171;

/// Obfuscate a plaintext payload
pub fn encrypt(plain: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    plain
        .iter()
        .map(|&b| {
            let c = key ^ b;
            key = c;
            c
        })
        .collect()
}

/// Recover the plaintext of an obfuscated payload
pub fn decrypt(cipher: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    cipher
        .iter()
        .map(|&b| {
            let p = key ^ b;
            key = b;
            p
        })
        .collect()
}

/// Encode a request as a length-prefixed TCP frame
pub fn encode_frame(plain: &[u8]) -> Bytes {
    let cipher = encrypt(plain);
    let mut frame = BytesMut::with_capacity(4 + cipher.len());
    frame.put_u32(cipher.len() as u32);
    frame.put_slice(&cipher);
    frame.freeze()
}

/// Validate and decode the length prefix of a TCP reply
pub fn decode_reply_len(prefix: [u8; 4], max: usize) -> Result<usize> {
    let len = u32::from_be_bytes(prefix) as usize;
    if len == 0 || len > max {
        return Err(DeviceError::Protocol(format!(
            "Unreasonable reply length {}",
            len
        )));
    }
    Ok(len)
}

/// The sysinfo query, asking the device for identity and child state
pub fn sysinfo_request() -> Vec<u8> {
    json!({"system": {"get_sysinfo": {}}}).to_string().into_bytes()
}

/// A relay command addressed to a single child outlet
pub fn relay_request(child_id: &str, on: bool) -> Vec<u8> {
    json!({
        "context": {"child_ids": [child_id]},
        "system": {"set_relay_state": {"state": if on { 1 } else { 0 }}},
    })
    .to_string()
    .into_bytes()
}

/// Envelope of a sysinfo reply
#[derive(Debug, Deserialize)]
pub struct SysInfoResponse {
    /// The system namespace
    pub system: SysInfoSystem,
}

/// System namespace of a sysinfo reply
#[derive(Debug, Deserialize)]
pub struct SysInfoSystem {
    /// The sysinfo body
    #[serde(rename = "get_sysinfo")]
    pub get_sysinfo: SysInfo,
}

/// Device identity and child state as reported by `get_sysinfo`
#[derive(Debug, Clone, Deserialize)]
pub struct SysInfo {
    /// The device's display name
    pub alias: String,
    /// The device's model string
    pub model: String,
    /// The device's identifier
    #[serde(rename = "deviceId")]
    pub device_id: String,
    /// Child outlets; absent on single-socket devices
    #[serde(default)]
    pub children: Vec<ChildInfo>,
    /// Device-reported error code, zero on success
    #[serde(default)]
    pub err_code: i64,
}

/// One child outlet in a sysinfo reply
#[derive(Debug, Clone, Deserialize)]
pub struct ChildInfo {
    /// The child's identifier, either the full id or a bare suffix
    pub id: String,
    /// The child's display name
    pub alias: String,
    /// Relay state, 1 when on
    pub state: u8,
}

impl SysInfo {
    /// Resolve the full child id for an outlet
    ///
    /// Newer firmware reports full ids (`deviceId` plus a two-digit suffix);
    /// older firmware reports only the suffix, which gets prefixed here.
    pub fn child_id(&self, child: &ChildInfo) -> String {
        if child.id.starts_with(&self.device_id) {
            child.id.clone()
        } else {
            format!("{}{}", self.device_id, child.id)
        }
    }
}

/// Parse a decrypted sysinfo reply
pub fn parse_sysinfo(plain: &[u8]) -> Result<SysInfo> {
    let response: SysInfoResponse = serde_json::from_slice(plain)?;
    let info = response.system.get_sysinfo;
    if info.err_code != 0 {
        return Err(DeviceError::CommandRejected(info.err_code));
    }
    Ok(info)
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    system: RelaySystem,
}

#[derive(Debug, Deserialize)]
struct RelaySystem {
    #[serde(rename = "set_relay_state")]
    set_relay_state: RelayResult,
}

#[derive(Debug, Deserialize)]
struct RelayResult {
    #[serde(default)]
    err_code: i64,
}

/// Parse a decrypted `set_relay_state` reply, failing on a non-zero err_code
pub fn parse_relay_reply(plain: &[u8]) -> Result<()> {
    let response: RelayResponse = serde_json::from_slice(plain)?;
    match response.system.set_relay_state.err_code {
        0 => Ok(()),
        code => Err(DeviceError::CommandRejected(code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cipher_round_trip() {
        let plain = sysinfo_request();
        let cipher = encrypt(&plain);
        assert_ne!(cipher, plain);
        assert_eq!(decrypt(&cipher), plain);
    }

    #[test]
    fn test_cipher_first_byte() {
        // First plaintext byte is '{' (0x7B); the initial key is 171 (0xAB).
        let cipher = encrypt(b"{}");
        assert_eq!(cipher[0], 0xAB ^ 0x7B);
    }

    #[test]
    fn test_frame_layout() {
        let frame = encode_frame(b"{}");
        assert_eq!(&frame[..4], &2u32.to_be_bytes());
        assert_eq!(decrypt(&frame[4..]), b"{}");
    }

    #[test]
    fn test_decode_reply_len() {
        assert_eq!(decode_reply_len(16u32.to_be_bytes(), 1024).unwrap(), 16);
        assert!(decode_reply_len(0u32.to_be_bytes(), 1024).is_err());
        assert!(decode_reply_len(2048u32.to_be_bytes(), 1024).is_err());
    }

    #[test]
    fn test_parse_sysinfo() {
        let reply = serde_json::json!({
            "system": {"get_sysinfo": {
                "alias": "Rack Strip",
                "model": "HS300(US)",
                "deviceId": "8006ABCD",
                "err_code": 0,
                "children": [
                    {"id": "8006ABCD00", "alias": "Lamp", "state": 0},
                    {"id": "01", "alias": "Router", "state": 1},
                ],
            }},
        });
        let info = parse_sysinfo(reply.to_string().as_bytes()).unwrap();
        assert_eq!(info.alias, "Rack Strip");
        assert_eq!(info.children.len(), 2);
        assert_eq!(info.child_id(&info.children[0]), "8006ABCD00");
        assert_eq!(info.child_id(&info.children[1]), "8006ABCD01");
    }

    #[test]
    fn test_parse_sysinfo_err_code() {
        let reply = serde_json::json!({
            "system": {"get_sysinfo": {
                "alias": "a", "model": "m", "deviceId": "d", "err_code": -1,
            }},
        });
        let err = parse_sysinfo(reply.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, DeviceError::CommandRejected(-1)));
    }

    #[test]
    fn test_parse_relay_reply() {
        let ok = br#"{"system":{"set_relay_state":{"err_code":0}}}"#;
        assert!(parse_relay_reply(ok).is_ok());

        let rejected = br#"{"system":{"set_relay_state":{"err_code":-3}}}"#;
        assert!(matches!(
            parse_relay_reply(rejected).unwrap_err(),
            DeviceError::CommandRejected(-3)
        ));
    }

    #[test]
    fn test_relay_request_shape() {
        let request: serde_json::Value =
            serde_json::from_slice(&relay_request("8006ABCD02", true)).unwrap();
        assert_eq!(request["context"]["child_ids"][0], "8006ABCD02");
        assert_eq!(request["system"]["set_relay_state"]["state"], 1);
    }
}
