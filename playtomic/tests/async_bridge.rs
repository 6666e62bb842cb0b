use playtomic::async_bridge;
use pollster::block_on;

#[derive(Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
}

#[async_bridge]
fn fetch_user(id: u32, completion: impl FnOnce(Result<User, String>)) {
    if id == 0 {
        completion(Err("no such user".to_owned()));
    } else {
        completion(Ok(User { id, name: format!("user{}", id) }));
    }
}

#[async_bridge]
fn checksum(bytes: &[u8], done: &dyn Fn(u8)) {
    done(bytes.iter().fold(0_u8, |sum, byte| sum.wrapping_add(*byte)));
}

struct Client {
    base: u32,
}

impl Client {
    #[async_bridge]
    pub fn add(&self, value: u32, done: Box<dyn Fn(u32) + Send>) {
        done(self.base + value);
    }

    #[async_bridge]
    async fn double<F>(&self, value: u32, done: F)
    where
        F: FnOnce(u32),
    {
        done(value * 2);
    }

    #[async_bridge]
    fn count(&mut self, (from, to): (u32, u32), mut done: impl FnMut(u32)) -> bool {
        self.base += 1;
        done(to - from);
        true
    }
}

async fn first_user_name(id: u32) -> Result<String, String> {
    Ok(fetch_user_async(id).await?.name)
}

#[test]
fn bridges_free_functions() {
    assert_eq!(block_on(fetch_user_async(7)), Ok(User { id: 7, name: "user7".to_owned() }));
    assert_eq!(block_on(checksum_async(&[1, 2, 255])), 2);
}

#[test]
fn errors_propagate_with_question_mark() {
    assert_eq!(block_on(first_user_name(3)), Ok("user3".to_owned()));
    assert_eq!(block_on(first_user_name(0)), Err("no such user".to_owned()));
}

#[test]
fn bridges_methods() {
    let mut client = Client { base: 40 };
    assert_eq!(block_on(client.add_async(2)), 42);
    assert_eq!(block_on(client.double_async(21)), 42);
    assert_eq!(block_on(client.count_async((3, 10))), 7);
    assert_eq!(client.base, 41);
}

#[test]
fn the_original_is_kept() {
    let mut seen = None;
    fetch_user(0, |result| seen = Some(result));
    assert_eq!(seen, Some(Err("no such user".to_owned())));
}
