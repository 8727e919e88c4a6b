//! SNMPv2c агент на loopback UDP поверх MIB из [`FakeAgent`].
//!
//! Понимает только GETBULK с одним varbind, этого хватает для обхода.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

use super::{CPU, FakeAgent, PROC_MEM, PROC_NAME, STORAGE, oid_key, oid_string};

const ROOTS: [&str; 4] = [STORAGE, PROC_NAME, PROC_MEM, CPU];

/// Потеря запросов к поддереву
#[derive(Debug, Clone, Copy)]
pub enum Loss {
    /// не отвечать никогда
    All,
    /// не отвечать на первые n запросов
    First(usize),
}

pub struct UdpAgent {
    pub addr: SocketAddr,
    requests: Arc<Mutex<HashMap<&'static str, usize>>>,
    task: JoinHandle<()>,
}

impl UdpAgent {
    pub async fn start(agent: FakeAgent, losses: Vec<(&'static str, Loss)>) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(HashMap::new()));

        let counter = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            let mut buf = vec![0u8; 65535];
            loop {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                let Some(request) = GetBulk::decode(&buf[..len]) else {
                    continue;
                };

                let root = ROOTS.into_iter().find(|root| {
                    let key = oid_key(root);
                    request.oid.starts_with(&key)
                });
                let seen = root.map(|root| {
                    let mut counter = counter.lock().unwrap();
                    let seen = counter.entry(root).or_insert(0);
                    *seen += 1;
                    *seen
                });
                let dropped = root
                    .and_then(|root| losses.iter().find(|(r, _)| *r == root))
                    .is_some_and(|(_, loss)| match loss {
                        Loss::All => true,
                        Loss::First(n) => seen.unwrap_or(0) <= *n,
                    });
                if dropped {
                    continue;
                }

                let page = agent.page_after(&oid_string(&request.oid), request.max_repetitions);
                let _ = socket.send_to(&request.response(&page), peer).await;
            }
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    /// Сколько GETBULK пришло в поддерево, включая потерянные
    pub fn requests(&self, root: &str) -> usize {
        self.requests.lock().unwrap().get(root).copied().unwrap_or(0)
    }
}

impl Drop for UdpAgent {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct GetBulk {
    community: Vec<u8>,
    request_id: Vec<u8>,
    max_repetitions: u32,
    oid: Vec<u64>,
}

impl GetBulk {
    fn decode(packet: &[u8]) -> Option<Self> {
        let (message, _) = expect(packet, 0x30)?;
        let (version, rest) = expect(message, 0x02)?;
        if version != [1] {
            return None;
        }
        let (community, rest) = expect(rest, 0x04)?;
        let (pdu, _) = expect(rest, 0xa5)?;
        let (request_id, rest) = expect(pdu, 0x02)?;
        let (_non_repeaters, rest) = expect(rest, 0x02)?;
        let (max_repetitions, rest) = expect(rest, 0x02)?;
        let (varbinds, _) = expect(rest, 0x30)?;
        let (varbind, _) = expect(varbinds, 0x30)?;
        let (oid, _) = expect(varbind, 0x06)?;

        Some(Self {
            community: community.to_vec(),
            request_id: request_id.to_vec(),
            max_repetitions: max_repetitions
                .iter()
                .fold(0u32, |acc, b| (acc << 8) | u32::from(*b)),
            oid: decode_oid(oid)?,
        })
    }

    fn response(&self, page: &[(String, String)]) -> Vec<u8> {
        let mut varbinds = Vec::new();
        for (oid, value) in page {
            varbinds.extend(tlv(0x30, &[encode_oid(&oid_key(oid)), encode_value(value)].concat()));
        }
        if page.len() < self.max_repetitions as usize {
            let last = page.last().map(|(oid, _)| oid_key(oid)).unwrap_or_else(|| self.oid.clone());
            // endOfMibView
            varbinds.extend(tlv(0x30, &[encode_oid(&last), vec![0x82, 0x00]].concat()));
        }

        let pdu = [
            tlv(0x02, &self.request_id),
            encode_int(0),
            encode_int(0),
            tlv(0x30, &varbinds),
        ]
        .concat();
        tlv(
            0x30,
            &[encode_int(1), tlv(0x04, &self.community), tlv(0xa2, &pdu)].concat(),
        )
    }
}

/// tag, содержимое, остаток
fn read_tlv(buf: &[u8]) -> Option<(u8, &[u8], &[u8])> {
    let (&tag, rest) = buf.split_first()?;
    let (&first, rest) = rest.split_first()?;
    let (len, rest) = if first < 0x80 {
        (first as usize, rest)
    } else {
        let n = (first & 0x7f) as usize;
        if n == 0 || n > 4 || rest.len() < n {
            return None;
        }
        let len = rest[..n].iter().fold(0usize, |acc, b| (acc << 8) | *b as usize);
        (len, &rest[n..])
    };
    if rest.len() < len {
        return None;
    }
    Some((tag, &rest[..len], &rest[len..]))
}

fn expect(buf: &[u8], tag: u8) -> Option<(&[u8], &[u8])> {
    let (found, content, rest) = read_tlv(buf)?;
    (found == tag).then_some((content, rest))
}

fn decode_oid(bytes: &[u8]) -> Option<Vec<u64>> {
    let (&first, rest) = bytes.split_first()?;
    let mut arcs = vec![u64::from(first / 40), u64::from(first % 40)];
    let mut acc = 0u64;
    for b in rest {
        acc = (acc << 7) | u64::from(b & 0x7f);
        if b & 0x80 == 0 {
            arcs.push(acc);
            acc = 0;
        }
    }
    Some(arcs)
}

fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let len = content.len();
    let mut out = vec![tag];
    if len < 0x80 {
        out.push(len as u8);
    } else if len <= 0xff {
        out.extend([0x81, len as u8]);
    } else {
        out.extend([0x82, (len >> 8) as u8, len as u8]);
    }
    out.extend_from_slice(content);
    out
}

fn encode_oid(arcs: &[u64]) -> Vec<u8> {
    let mut out = vec![(arcs[0] * 40 + arcs[1]) as u8];
    for &arc in &arcs[2..] {
        let mut chunk = vec![(arc & 0x7f) as u8];
        let mut rest = arc >> 7;
        while rest > 0 {
            chunk.push((rest & 0x7f) as u8 | 0x80);
            rest >>= 7;
        }
        chunk.reverse();
        out.extend(chunk);
    }
    tlv(0x06, &out)
}

fn encode_int(n: i64) -> Vec<u8> {
    let bytes = n.to_be_bytes();
    let mut start = 0;
    while start < 7
        && ((bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xff && bytes[start + 1] & 0x80 != 0))
    {
        start += 1;
    }
    tlv(0x02, &bytes[start..])
}

/// Числа уходят как INTEGER, остальное как OCTET STRING
fn encode_value(value: &str) -> Vec<u8> {
    match value.parse::<i64>() {
        Ok(n) => encode_int(n),
        Err(_) => tlv(0x04, value.as_bytes()),
    }
}
